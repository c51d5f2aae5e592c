/*!
The ontology classifier (§4.9): given Γ alone, reports unsatisfiable atomic
concepts and pairwise subsumptions between atomic propositions. Grounded in
`performClassification()` in `bddtab.cpp`.

Caches persist across every sat-check performed here (the default/default
unsat cache is monotone: a learned no-good remains valid under further
conjunction), so the caller is expected to drive every sat-check through the
same engine/cache instance for one classification run.
*/

use biodivine_lib_bdd::Bdd;
use lasso::Rodeo;

use crate::bdd::Manager;
use crate::formula::AtomicKey;
use crate::registry::Registry;

/// The result of classifying one Γ.
#[derive(Debug, Default)]
pub struct ClassifyReport {
    /// Γ itself was unsatisfiable; no further tests were performed (matching
    /// `performClassification`'s short-circuit).
    pub unsatisfiable_ontology: bool,
    /// Atomic propositions `c` for which `Γ ∧ c` is unsatisfiable.
    pub empty_classes: Vec<String>,
    /// Ordered pairs `(c, d)` for which `Γ ∧ c ∧ ¬d` is unsatisfiable,
    /// i.e. `c ⊑ d` is entailed by Γ.
    pub subsumptions: Vec<(String, String)>,
}

/// Drives the classification given a sat-check closure --- kept generic over
/// `is_sat` rather than coupled to [crate::engine::k::KEngine] or
/// [crate::engine::s4::S4Engine] directly, since both expose the same shape
/// of "decide one BDD" operation and classification doesn't otherwise touch
/// engine internals.
pub fn classify(
    registry: &Registry,
    names: &Rodeo,
    manager: &Manager,
    gamma_bdd: &Bdd,
    mut is_sat: impl FnMut(&Bdd) -> bool,
) -> ClassifyReport {
    let mut report = ClassifyReport::default();

    if !is_sat(gamma_bdd) {
        report.unsatisfiable_ontology = true;
        return report;
    }

    let props: Vec<_> = registry
        .vars()
        .filter(|&v| matches!(registry.key(v), AtomicKey::Prop(_)))
        .collect();

    for &c in &props {
        let test = gamma_bdd.and(&manager.ithvar(c));
        if !is_sat(&test) {
            report.empty_classes.push(prop_name(registry, names, c));
        }
    }

    for &c in &props {
        for &d in &props {
            if c == d {
                continue;
            }
            let test = gamma_bdd.and(&manager.ithvar(c)).and(&manager.nithvar(d));
            if !is_sat(&test) {
                report
                    .subsumptions
                    .push((prop_name(registry, names, c), prop_name(registry, names, d)));
            }
        }
    }

    report
}

fn prop_name(registry: &Registry, names: &Rodeo, v: crate::registry::VarId) -> String {
    match registry.key(v) {
        AtomicKey::Prop(spur) => names.resolve(&spur).to_string(),
        AtomicKey::Modal { .. } => unreachable!("classification only iterates propositional atoms"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Arena;
    use crate::roles::RoleInterner;

    #[test]
    fn unsatisfiable_ontology_short_circuits() {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let gamma = crate::parser::parse_line("p & ~p", &mut arena, &mut names, &mut roles).unwrap();
        let not_psi = arena.mk_false();
        let registry = Registry::build(gamma, not_psi, &arena);
        let manager = Manager::new(&registry);
        let gamma_bdd = crate::bdd::to_bdd(gamma, &arena, &registry, &manager, false);

        let report = classify(&registry, &names, &manager, &gamma_bdd, |b| !b.is_false());
        assert!(report.unsatisfiable_ontology);
        assert!(report.empty_classes.is_empty());
    }

    #[test]
    fn dog_mammal_animal_subsumption() {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let gamma = crate::parser::parse_line(
            "[](dog => mammal) & [](mammal => animal)",
            &mut arena,
            &mut names,
            &mut roles,
        )
        .unwrap();
        let not_psi = arena.mk_false();
        let registry = Registry::build(gamma, not_psi, &arena);
        let manager = Manager::new(&registry);
        let gamma_bdd = crate::bdd::to_bdd(gamma, &arena, &registry, &manager, false);

        // this Γ has no modal obligations reachable from a plain
        // propositional combination, so a naive "is b satisfiable" closure
        // over the BDD alone (no modal jumps) suffices for this Γ shape.
        let report = classify(&registry, &names, &manager, &gamma_bdd, |b| !b.is_false());
        assert!(!report.unsatisfiable_ontology);
        assert!(report.subsumptions.contains(&("dog".to_string(), "mammal".to_string())));
    }
}
