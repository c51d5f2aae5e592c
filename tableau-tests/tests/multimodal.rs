//! Multi-modal K decisions, where `existsDia` (spec.md §4.1) is never
//! wired --- more than one named role silently drops the mono-modal
//! short-circuit (spec.md §9 "source oddities").

use tableau::config::Config;
use tableau::context::{Context, DecisionOutcome};

fn provable(formula: &str, gamma: Option<&str>) -> bool {
    let ctx = Context::new(Config::default());
    match ctx.decide(formula, gamma).unwrap() {
        DecisionOutcome::Decided(report) => report.provable,
        DecisionOutcome::EmptyFormula => panic!("unexpected empty formula for {formula:?}"),
    }
}

#[test]
fn distinct_roles_do_not_share_obligations() {
    assert!(!provable("[r1]p => [r2]p", None));
    assert!(!provable("<r1>p => <r2>p", None));
}

#[test]
fn a_role_local_contradiction_is_still_detected() {
    // `<r1>(p & ~p)` is itself unsatisfiable --- no world along r1 can ever
    // satisfy `p & ~p` --- so it entails anything, vacuously.
    assert!(provable("<r1>(p & ~p) => q", None));
}

#[test]
fn three_roles_keep_their_obligations_separate() {
    assert!(!provable("[r1]p & [r2]p => [r3]p", None));
}

#[test]
fn multi_modal_gamma_applies_to_every_role() {
    // Gamma holding globally constrains every role's successor worlds
    // equally: `[r1](p => q)` and `[r2](p => q)` both hold everywhere, so
    // a two-step implication along either role alone is provable.
    let gamma = "[r1](p => q) & [r2](p => q)";
    assert!(provable("[r1][r1]p => [r1][r1]q", Some(gamma)));
    assert!(provable("[r2][r2]p => [r2][r2]q", Some(gamma)));
}
