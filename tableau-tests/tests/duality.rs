//! Quantified invariants from spec.md §8: duality, monotonicity of Gamma,
//! and idempotence (same query on a fresh engine twice agrees).

use tableau::config::Config;
use tableau::context::{Context, DecisionOutcome};

fn decide(formula: &str, gamma: Option<&str>) -> bool {
    let ctx = Context::new(Config::default());
    match ctx.decide(formula, gamma).unwrap() {
        DecisionOutcome::Decided(report) => report.provable,
        DecisionOutcome::EmptyFormula => panic!("unexpected empty formula for {formula:?}"),
    }
}

const DUALITY_FORMULAS: &[&str] = &[
    "p",
    "p & q",
    "p | ~p",
    "p & ~p",
    "[]p",
    "<>p",
    "[]p => p",
    "[]p => [][]p",
    "[r1]p => [r2]p",
    "(p => q) => ([]p => []q)",
];

#[test]
fn duality_of_validity_and_satisfiability() {
    // decide(psi, valid) = not decide(not psi, sat); here "provable" already
    // *is* "not_psi is unsatisfiable", so duality says: psi is provable iff
    // (not psi) is not provable... expressed directly as psi provable XOR
    // not-psi provable is false exactly when both psi and not-psi decide to
    // the same satisfiability of their own negation --- check the relation
    // the spec actually states: provable(psi) == !sat(not psi), and
    // provable(not psi) == !sat(not not psi) == !sat(psi). So provable(psi)
    // and provable(not psi) can't both hold (that would mean both psi and
    // not psi are valid, i.e. both not-psi and psi are unsatisfiable, i.e.
    // everything is unsatisfiable, i.e. there is no model at all --- which
    // never happens here since `True` is always satisfiable).
    for &formula in DUALITY_FORMULAS {
        let not_formula = format!("~({formula})");
        let psi_provable = decide(formula, None);
        let not_psi_provable = decide(&not_formula, None);
        assert!(
            !(psi_provable && not_psi_provable),
            "both {formula:?} and its negation were reported provable"
        );
    }
}

#[test]
fn double_negation_round_trips_through_decision() {
    for &formula in DUALITY_FORMULAS {
        let double_negated = format!("~(~({formula}))");
        assert_eq!(
            decide(formula, None),
            decide(&double_negated, None),
            "double negation changed the decision for {formula:?}"
        );
    }
}

#[test]
fn monotonicity_of_gamma_strengthening() {
    // If (psi, gamma) is valid, then (psi, gamma & phi) is valid for any phi:
    // strengthening Gamma can only make not-psi-and-gamma harder to satisfy.
    let cases: &[(&str, &str, &str)] = &[
        ("p", "p", "q"),
        ("p => q", "p => q", "r | ~r"),
        ("[][]p => [][]q", "[](p => q)", "s"),
    ];
    for &(psi, gamma, extra) in cases {
        assert!(
            decide(psi, Some(gamma)),
            "expected {psi:?} provable from {gamma:?} to begin with"
        );
        let strengthened = format!("({gamma}) & ({extra})");
        assert!(
            decide(psi, Some(&strengthened)),
            "{psi:?} stopped being provable after strengthening gamma with {extra:?}"
        );
    }
}

#[test]
fn idempotence_of_repeated_decisions() {
    for &formula in DUALITY_FORMULAS {
        let first = decide(formula, None);
        let second = decide(formula, None);
        assert_eq!(first, second, "repeated decision disagreed for {formula:?}");
    }
}
