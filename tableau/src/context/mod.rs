/*!
[Context] ties parsing, role interning, the atom registry, the BDD manager,
caches, and whichever engine is configured into the two entry points a
caller (the CLI, or a test) actually needs: [Context::decide] and
[Context::classify]. Grounded in `main()`'s driving logic in `bddtab.cpp`
(build Γ, build `¬ψ ∧ Γ`, pick the engine by `-s4`, report).
*/

use std::collections::HashSet;

use biodivine_lib_bdd::Bdd;
use lasso::Rodeo;

use crate::bdd::{to_bdd, Manager};
use crate::caches::Caches;
use crate::classify::{self, ClassifyReport};
use crate::config::Config;
use crate::engine::k::KEngine;
use crate::engine::s4::S4Engine;
use crate::engine::ModalCache;
use crate::formula::{Arena, AtomicKey, FormulaId};
use crate::parser;
use crate::registry::Registry;
use crate::reports::{ClassifyOutput, DecisionReport, Logic};
use crate::roles::RoleInterner;
use crate::types::err::{ErrorKind, UnsupportedConstruct};

/// The outcome of [Context::decide]: either the input was empty (line 1
/// blank, no `-g`), which spec.md §8 calls "trivially provable" and gives
/// its own message, or a genuine K/S4 decision was made.
pub enum DecisionOutcome {
    /// Empty ψ without `-g`: "Empty formula is provable." + exit 1, per
    /// spec.md §8's round-trip case. This still exits nonzero even though
    /// the formula is provable --- the source treats "nothing to decide" as
    /// an input-shape error, not a successful decision.
    EmptyFormula,
    Decided(DecisionReport),
}

/// Owns one parse/registry/cache arena for a single decision or
/// classification run. Not reused across runs --- every call to [Context::decide]
/// or [Context::classify] starts a fresh [Arena]/[Registry]/[Caches], matching
/// spec.md §3 "Lifetimes" (caches are cleared between top-level invocations).
pub struct Context {
    config: Config,
}

impl Context {
    pub fn new(config: Config) -> Context {
        Context { config }
    }

    /// Decides `psi_line` (optionally with a second line `gamma_line` when
    /// `-g` is set).
    pub fn decide(
        &self,
        psi_line: &str,
        gamma_line: Option<&str>,
    ) -> Result<DecisionOutcome, ErrorKind> {
        if psi_line.trim().is_empty() && gamma_line.is_none() {
            log::info!("empty psi with no gamma: trivially provable");
            return Ok(DecisionOutcome::EmptyFormula);
        }

        log::info!(
            "deciding {} psi={psi_line:?} gamma={gamma_line:?}",
            if self.config.s4 { "S4" } else { "K" }
        );

        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();

        let psi = parser::parse_line(psi_line, &mut arena, &mut names, &mut roles)?;
        let not_psi = arena.negate(psi);
        let gamma = match gamma_line {
            Some(line) => parser::parse_line(line, &mut arena, &mut names, &mut roles)?,
            None => arena.mk_true(),
        };

        let num_vars_before = Registry::build(gamma, not_psi, &arena).num_vars();
        let registry = self.build_registry(gamma, not_psi, &mut arena);
        reject_inverse_roles(&registry)?;

        let num_roles = roles.num_roles().max(1);
        let mono_modal_exists_dia = !self.config.s4 && num_roles <= 1;
        let manager = Manager::new(&registry);

        let gamma_bdd = to_bdd(gamma, &arena, &registry, &manager, mono_modal_exists_dia);
        let not_psi_and_gamma_bdd =
            to_bdd(not_psi, &arena, &registry, &manager, mono_modal_exists_dia).and(&gamma_bdd);

        let mut caches = Caches::new(
            self.config.unsat_cache_kind,
            self.config.max_cache_size,
            manager.bdd_true(),
        );
        let mut modal = ModalCache::new(&arena, &registry, &manager, mono_modal_exists_dia);

        let (sat, mut stats) = if self.config.s4 {
            let mut engine = S4Engine::new(
                &registry,
                &manager,
                gamma_bdd,
                self.config.right_to_left,
                &mut caches,
                &mut modal,
            );
            let outcome = engine.is_sat(&not_psi_and_gamma_bdd);
            (outcome.sat, engine.stats)
        } else {
            let mut engine = KEngine::new(
                &registry,
                &manager,
                gamma_bdd,
                num_roles,
                self.config.right_to_left,
                &mut caches,
                &mut modal,
            );
            let outcome = engine.is_sat(&not_psi_and_gamma_bdd);
            (outcome.sat, engine.stats)
        };

        stats.num_vars = num_vars_before;
        stats.num_vars_reduced = registry.num_vars();
        stats.sat_cache_adds = caches.sat.adds;
        stats.sat_cache_hits = caches.sat.hits;
        stats.unsat_cache_adds = caches.unsat_adds;
        stats.unsat_cache_hits = caches.unsat_hits;
        stats.temp_sat_cache_adds = caches.cond_sat.adds;
        stats.temp_sat_cache_confirmed = caches.cond_sat.confirmed;
        stats.temp_sat_cache_rejected = caches.cond_sat.rejected;

        Ok(DecisionOutcome::Decided(DecisionReport {
            logic: if self.config.s4 { Logic::S4 } else { Logic::K },
            provable: !sat,
            stats,
        }))
    }

    /// Classifies `gamma_line` alone (`-classify`), always decided in K
    /// (classification has no `-s4` counterpart in spec.md §4.9/§6: the
    /// mode takes Γ only, and the source's `performClassification` always
    /// calls `isSatisfiableK`).
    pub fn classify(&self, gamma_line: &str) -> Result<ClassifyOutput, ErrorKind> {
        log::info!("classifying gamma={gamma_line:?}");
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();

        let gamma = parser::parse_line(gamma_line, &mut arena, &mut names, &mut roles)?;
        let not_psi = arena.mk_false();

        let registry = self.build_registry(gamma, not_psi, &mut arena);
        reject_inverse_roles(&registry)?;

        let num_roles = roles.num_roles().max(1);
        let mono_modal_exists_dia = num_roles <= 1;
        let manager = Manager::new(&registry);
        let gamma_bdd = to_bdd(gamma, &arena, &registry, &manager, mono_modal_exists_dia);

        let mut caches = Caches::new(
            self.config.unsat_cache_kind,
            self.config.max_cache_size,
            manager.bdd_true(),
        );
        let mut modal = ModalCache::new(&arena, &registry, &manager, mono_modal_exists_dia);
        let mut engine = KEngine::new(
            &registry,
            &manager,
            gamma_bdd.clone(),
            num_roles,
            self.config.right_to_left,
            &mut caches,
            &mut modal,
        );

        let report: ClassifyReport = classify::classify(&registry, &names, &manager, &gamma_bdd, |b| {
            engine.is_sat(b).sat
        });

        Ok(ClassifyOutput { report })
    }

    fn build_registry(&self, gamma: FormulaId, not_psi: FormulaId, arena: &mut Arena) -> Registry {
        let registry = Registry::build(gamma, not_psi, arena);
        if self.config.normalize {
            normalize(&registry, gamma, not_psi, arena)
        } else {
            registry
        }
    }
}

/// `-norm` (§4.1): walk the registered boxes in reverse order, computing
/// each one's `unbox` BDD with a throwaway `Manager`/`ModalCache`; if an
/// earlier-registered box already produced the same BDD, the later box is
/// dropped and every reference to it is rewritten to the earlier one.
///
/// Rebuilding the registry from scratch after coalescing (rather than
/// mutating variable ids in place) keeps every downstream consumer --- the
/// real `Manager` built afterwards, `children()` --- working over a dense,
/// contiguous `VarId` space with no gaps left by the dropped boxes.
fn normalize(registry: &Registry, gamma: FormulaId, not_psi: FormulaId, arena: &mut Arena) -> Registry {
    let probe_manager = Manager::new(registry);
    let mut probe_modal = ModalCache::new(arena, registry, &probe_manager, false);
    let mut stats = crate::engine::Stats::default();

    let boxes: Vec<_> = registry.vars().filter(|&v| registry.is_modal(v)).collect();
    let mut seen: Vec<(Bdd, AtomicKey)> = Vec::new();
    let mut canonical: std::collections::HashMap<AtomicKey, AtomicKey> = std::collections::HashMap::new();

    for &v in boxes.iter().rev() {
        let key = registry.key(v);
        let unboxed = probe_modal.unbox(v, &mut stats);
        if let Some((_, earlier_key)) = seen.iter().find(|(b, _)| *b == unboxed) {
            canonical.insert(key, *earlier_key);
        } else {
            seen.push((unboxed, key));
        }
    }

    if canonical.is_empty() {
        // No coalescing possible; rebuilding would be a no-op, so skip it.
        return Registry::build(gamma, not_psi, arena);
    }

    let rewritten_gamma = rewrite_keys(gamma, arena, &canonical);
    let rewritten_not_psi = rewrite_keys(not_psi, arena, &canonical);
    Registry::build(rewritten_gamma, rewritten_not_psi, arena)
}

fn rewrite_keys(
    id: FormulaId,
    arena: &mut Arena,
    canonical: &std::collections::HashMap<AtomicKey, AtomicKey>,
) -> FormulaId {
    use crate::formula::FormulaOp;
    match arena.get(id) {
        FormulaOp::True => arena.mk_true(),
        FormulaOp::False => arena.mk_false(),
        FormulaOp::And(l, r) => {
            let l = rewrite_keys(l, arena, canonical);
            let r = rewrite_keys(r, arena, canonical);
            arena.mk_and(l, r)
        }
        FormulaOp::Or(l, r) => {
            let l = rewrite_keys(l, arena, canonical);
            let r = rewrite_keys(r, arena, canonical);
            arena.mk_or(l, r)
        }
        FormulaOp::Atom { key, positive } => {
            let key = match key {
                AtomicKey::Modal { body, role, inverse } => {
                    let body = rewrite_keys(body, arena, canonical);
                    let rewritten = AtomicKey::Modal { role, inverse, body };
                    *canonical.get(&rewritten).unwrap_or(&rewritten)
                }
                prop => prop,
            };
            match key {
                AtomicKey::Prop(name) => arena.mk_prop(name, positive),
                AtomicKey::Modal { role, inverse, body } => arena.mk_box(role, inverse, body, positive),
            }
        }
    }
}

fn reject_inverse_roles(registry: &Registry) -> Result<(), ErrorKind> {
    for v in registry.vars() {
        if let AtomicKey::Modal { inverse: true, .. } = registry.key(v) {
            return Err(ErrorKind::Unsupported(UnsupportedConstruct::InverseRole));
        }
    }
    Ok(())
}
