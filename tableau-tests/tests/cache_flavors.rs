//! Every `Config` knob that only changes *how* a decision is reached
//! (valuation order, unsat-cache flavor, box-variable normalization) must
//! not change *what* is decided --- the quantified "idempotence"/determinism
//! property of spec.md §8, exercised per flag rather than only the default
//! configuration.

use tableau::caches::UnsatCacheKind;
use tableau::config::Config;
use tableau::context::{Context, DecisionOutcome};

const FORMULAS: &[(&str, Option<&str>)] = &[
    ("p => p", None),
    ("p & ~p", None),
    ("[]p => [][]p", None),
    ("[r1]p => [r2]p", None),
    ("p", Some("~p")),
    ("[](dog => mammal) & [](mammal => animal) => [](dog => animal)", None),
];

fn provable_with(config: Config, formula: &str, gamma: Option<&str>) -> bool {
    let ctx = Context::new(config);
    match ctx.decide(formula, gamma).unwrap() {
        DecisionOutcome::Decided(report) => report.provable,
        DecisionOutcome::EmptyFormula => panic!("unexpected empty formula for {formula:?}"),
    }
}

fn assert_same_as_default(config: Config) {
    for &(formula, gamma) in FORMULAS {
        let default = provable_with(Config::default(), formula, gamma);
        let under_test = provable_with(config.clone(), formula, gamma);
        assert_eq!(
            default, under_test,
            "formula {formula:?} (gamma {gamma:?}) disagreed under this config"
        );
    }
}

#[test]
fn right_to_left_valuation_agrees_with_left_to_right() {
    let mut config = Config::default();
    config.right_to_left = true;
    assert_same_as_default(config);
}

#[test]
fn single_bdd_unsat_cache_agrees_with_default_cache() {
    let mut config = Config::default();
    config.unsat_cache_kind = UnsatCacheKind::SingleBdd;
    assert_same_as_default(config);
}

#[test]
fn saturation_unsat_cache_agrees_with_default_cache() {
    let mut config = Config::default();
    config.unsat_cache_kind = UnsatCacheKind::Saturation;
    assert_same_as_default(config);
}

#[test]
fn disabled_unsat_cache_agrees_with_default_cache() {
    let mut config = Config::default();
    config.unsat_cache_kind = UnsatCacheKind::None;
    assert_same_as_default(config);
}

#[test]
fn box_normalization_agrees_with_default() {
    let mut config = Config::default();
    config.normalize = true;
    assert_same_as_default(config);
}

#[test]
fn normalization_coalesces_semantically_equal_boxes() {
    // `[r](a & b)` and `[r](b & a)` unbox to the same BDD up to commutativity,
    // so `-norm` should coalesce them into a single registered variable and
    // still decide the same outcome.
    let mut config = Config::default();
    config.normalize = true;
    let ctx = Context::new(config);
    let report = match ctx
        .decide("[r](a & b) => [r](b & a)", None)
        .unwrap()
    {
        DecisionOutcome::Decided(report) => report,
        DecisionOutcome::EmptyFormula => panic!("unexpected empty formula"),
    };
    assert!(report.provable);
}

#[test]
fn tiny_cache_bound_does_not_change_the_decision() {
    let mut config = Config::default();
    config.max_cache_size = 1;
    assert_same_as_default(config);
}
