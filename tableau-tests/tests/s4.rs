//! S4-specific scenarios exercising permanent facts and reflexive-transitive
//! closure (spec.md §4.8), beyond the single `[]p => [][]p` case in
//! `basic.rs`.

use tableau::config::Config;
use tableau::context::{Context, DecisionOutcome};

fn decide_s4(formula: &str, gamma: Option<&str>) -> bool {
    let mut config = Config::default();
    config.s4 = true;
    let ctx = Context::new(config);
    match ctx.decide(formula, gamma).unwrap() {
        DecisionOutcome::Decided(report) => report.provable,
        DecisionOutcome::EmptyFormula => panic!("unexpected empty formula for {formula:?}"),
    }
}

fn decide_k(formula: &str, gamma: Option<&str>) -> bool {
    let ctx = Context::new(Config::default());
    match ctx.decide(formula, gamma).unwrap() {
        DecisionOutcome::Decided(report) => report.provable,
        DecisionOutcome::EmptyFormula => panic!("unexpected empty formula for {formula:?}"),
    }
}

#[test]
fn s4_combines_reflexivity_and_transitivity() {
    // T and 4 together give the "5-world collapse": a box obligation that
    // must hold at the current world and every successor.
    assert!(decide_s4("[]p => ([]p & p & [][]p)", None));
}

#[test]
fn s4_does_not_prove_symmetry() {
    // The B axiom (`p => []<>p`) needs a symmetric relation; S4's
    // reflexive-transitive closure alone does not give it.
    assert!(!decide_s4("p => []<>p", None));
}

#[test]
fn s4_global_assumption_propagates_through_successors() {
    // Gamma = `[](p => q)` must hold at the current world and (by
    // reflexive-transitive closure) at every successor it is unboxed into.
    assert!(decide_s4("[]p => []q", Some("[](p => q)")));
}

#[test]
fn k_needs_two_steps_where_s4_needs_none() {
    // Gamma holds at every world, so in S4 reflexivity collapses
    // `[](p => q)` straight down to `p => q` at every world, making the
    // one-step `[]p => []q` provable already (see the previous test). In K,
    // without reflexivity, that same Gamma only gives `p => q` one modal
    // jump further out, so the one-step implication is not provable but the
    // two-step `[][]p => [][]q` is.
    assert!(!decide_k("[]p => []q", Some("[](p => q)")));
    assert!(decide_k("[][]p => [][]q", Some("[](p => q)")));
}

#[test]
fn s4_distinguishes_named_roles_like_k_does() {
    // S4's reflexive-transitive closure is per-relation; a fact closed
    // under role `r` does not leak into role `s`.
    assert!(!decide_s4("[r]p => [s]p", None));
}
