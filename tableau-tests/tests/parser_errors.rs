//! Parse and decision-time error paths (spec.md §6/§7): malformed surface
//! syntax, and inverse roles, which parse fine but are rejected once a
//! decision actually needs to resolve the accessibility relation.

use tableau::config::Config;
use tableau::context::Context;
use tableau::types::err::{ErrorKind, ParseError, UnsupportedConstruct};

fn parse_err(formula: &str) -> ParseError {
    let ctx = Context::new(Config::default());
    match ctx.decide(formula, None).unwrap_err() {
        ErrorKind::Parse(e) => e,
        other => panic!("expected a parse error for {formula:?}, got {other:?}"),
    }
}

#[test]
fn unbalanced_parenthesis_is_a_missing_delimiter() {
    assert!(matches!(
        parse_err("(p & q"),
        ParseError::MissingDelimiter { .. }
    ));
}

#[test]
fn trailing_operator_is_an_unexpected_end() {
    assert!(matches!(
        parse_err("p &"),
        ParseError::UnexpectedEnd { .. }
    ));
}

#[test]
fn empty_role_name_is_rejected() {
    assert!(matches!(
        parse_err("[]p &"),
        ParseError::UnexpectedEnd { .. }
    ));
    assert!(matches!(
        parse_err("[-]p"),
        ParseError::EmptyRoleName { .. }
    ));
}

#[test]
fn stray_trailing_token_is_unexpected() {
    assert!(matches!(
        parse_err("p q"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn inverse_role_parses_but_is_rejected_at_decision_time() {
    let ctx = Context::new(Config::default());
    let err = ctx.decide("[-r]p", None).unwrap_err();
    assert_eq!(
        err,
        ErrorKind::Unsupported(UnsupportedConstruct::InverseRole)
    );

    let err = ctx.decide("<-r>p", None).unwrap_err();
    assert_eq!(
        err,
        ErrorKind::Unsupported(UnsupportedConstruct::InverseRole)
    );
}

#[test]
fn inverse_role_in_gamma_is_also_rejected() {
    let ctx = Context::new(Config::default());
    let err = ctx.decide("p", Some("[-r]q")).unwrap_err();
    assert_eq!(
        err,
        ErrorKind::Unsupported(UnsupportedConstruct::InverseRole)
    );
}
