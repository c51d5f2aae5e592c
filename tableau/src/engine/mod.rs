/*!
Shared engine state: the statistics counters `-v` reports (grounded in
`printSummaryStatistics()`), and the lazy unbox/undiamond/`unbox_s4` caches
both [crate::engine::k] and [crate::engine::s4] consult.

The K and S4 procedures (§4.4/§4.8) otherwise share very little code --- the
modal-jump bookkeeping, the permanent-facts accumulator, and the responsible-
variable fixed point are different enough between the two that duplicating
the driving loop is clearer than forcing a common abstraction over it, which
is why they live in their own modules rather than behind one shared `fn`.
*/

pub mod k;
pub mod s4;

use std::collections::HashSet;

use biodivine_lib_bdd::Bdd;

use crate::bdd::{to_bdd, to_bdd_s4_unbox, to_not_bdd, Manager};
use crate::formula::{Arena, AtomicKey};
use crate::registry::{Registry, VarId};

/// Every counter `-v` reports, in `printSummaryStatistics()`'s order.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    pub num_vars: usize,
    pub num_vars_reduced: usize,
    pub depth: usize,
    pub max_depth: usize,
    pub total_modal_jumps_explored: u64,
    pub total_satisfiable_modal_jumps: u64,
    pub total_bdd_refinements: u64,
    pub num_false_from_box: u64,
    pub num_false_from_dia: u64,
    pub num_false_from_ref: u64,
    /// K-only: a box variable considered but not added while minimizing an
    /// immediate unboxing contradiction (`minimize_box_failure`), or while
    /// closing the responsible set outside the modal-jump general case.
    pub num_res_vars_ignored_from_box: u64,
    /// K-only: as above, for a diamond/box variable considered but not added
    /// while minimizing a modal jump's immediate contradiction
    /// (`minimize_dia_failure`, and S4's `minimize_jump_failure`).
    pub num_res_vars_ignored_from_dia: u64,
    /// K-only: a variable considered but not added while closing the
    /// responsible set after a modal jump's recursive satisfiability check
    /// (or its unsat-cache shortcut) came back false --- the source's
    /// "general case".
    pub num_res_vars_ignored_from_general: u64,
    pub loops_detected: u64,
    pub cached_unboxings: u64,
    pub unbox_cache_hits: u64,
    pub cached_undiamondings: u64,
    pub undiamond_cache_hits: u64,

    /// Filled in by [crate::context::Context::decide] after the registry and
    /// caches exist, rather than threaded through the engine's recursion:
    /// the sat/unsat cache counters belong to [crate::caches::Caches], and
    /// `num_vars`/`num_vars_reduced` to [crate::registry::Registry], neither
    /// of which the recursive `is_sat` call touches directly.
    pub sat_cache_adds: u64,
    pub sat_cache_hits: u64,
    pub unsat_cache_adds: u64,
    pub unsat_cache_hits: u64,
    pub temp_sat_cache_adds: u64,
    pub temp_sat_cache_confirmed: u64,
    pub temp_sat_cache_rejected: u64,
}

impl Stats {
    pub fn enter_frame(&mut self) {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.max_depth = self.depth;
        }
    }

    pub fn exit_frame(&mut self) {
        self.depth -= 1;
    }
}

/// The per-box-variable `unbox`/`undiamond`/`unbox_s4` memo tables (§4.3).
/// Unbounded: one entry per registered box variable, `O(numVars)`.
pub struct ModalCache<'a> {
    arena: &'a Arena,
    registry: &'a Registry,
    manager: &'a Manager,
    mono_modal_exists_dia: bool,
    unbox: Vec<Option<Bdd>>,
    undiamond: Vec<Option<Bdd>>,
    unbox_s4: Vec<Option<Bdd>>,
}

impl<'a> ModalCache<'a> {
    pub fn new(
        arena: &'a Arena,
        registry: &'a Registry,
        manager: &'a Manager,
        mono_modal_exists_dia: bool,
    ) -> Self {
        let n = registry.num_vars();
        ModalCache {
            arena,
            registry,
            manager,
            mono_modal_exists_dia,
            unbox: vec![None; n],
            undiamond: vec![None; n],
            unbox_s4: vec![None; n],
        }
    }

    fn body(&self, v: VarId) -> crate::formula::FormulaId {
        match self.registry.key(v) {
            AtomicKey::Modal { body, .. } => body,
            AtomicKey::Prop(_) => unreachable!("unbox/undiamond only ever called on a box variable"),
        }
    }

    /// `unbox(v)`: `to_bdd` of `v`'s immediate subformula, memoized.
    pub fn unbox(&mut self, v: VarId, stats: &mut Stats) -> Bdd {
        if let Some(b) = &self.unbox[v.index()] {
            stats.unbox_cache_hits += 1;
            return b.clone();
        }
        let body = self.body(v);
        let b = to_bdd(
            body,
            self.arena,
            self.registry,
            self.manager,
            self.mono_modal_exists_dia,
        );
        self.unbox[v.index()] = Some(b.clone());
        stats.cached_unboxings += 1;
        b
    }

    /// `undiamond(v)`: `to_not_bdd` of `v`'s immediate subformula, memoized.
    pub fn undiamond(&mut self, v: VarId, stats: &mut Stats) -> Bdd {
        if let Some(b) = &self.undiamond[v.index()] {
            stats.undiamond_cache_hits += 1;
            return b.clone();
        }
        let body = self.body(v);
        let b = to_not_bdd(
            body,
            self.arena,
            self.registry,
            self.manager,
            self.mono_modal_exists_dia,
        );
        self.undiamond[v.index()] = Some(b.clone());
        stats.cached_undiamondings += 1;
        b
    }

    /// `unbox_s4(v)`: `to_bdd_s4_unbox` of `v`'s immediate subformula,
    /// memoized separately from [Self::unbox] since it strips chained
    /// surface boxes rather than emitting a literal for each.
    pub fn unbox_s4(&mut self, v: VarId) -> Bdd {
        if let Some(b) = &self.unbox_s4[v.index()] {
            return b.clone();
        }
        let body = self.body(v);
        let b = to_bdd_s4_unbox(body, self.arena, self.registry, self.manager);
        self.unbox_s4[v.index()] = Some(b.clone());
        b
    }
}

/// Walks a `satone` path, splitting its modal literals into `box_vars`
/// (asserted positively: `[r]φ` holds) and `dia_vars` (asserted negatively:
/// `⟨r⟩¬φ` holds). `existsDia` and propositional atoms are skipped.
pub fn extract_satisfying_modal_vars(
    path: &[(VarId, bool)],
    registry: &Registry,
) -> (Vec<VarId>, Vec<VarId>) {
    let mut box_vars = Vec::new();
    let mut dia_vars = Vec::new();
    for &(v, val) in path {
        if v == Registry::EXISTS_DIA || !registry.is_modal(v) {
            continue;
        }
        if val {
            box_vars.push(v);
        } else {
            dia_vars.push(v);
        }
    }
    (box_vars, dia_vars)
}

/// The role of a (necessarily modal) variable.
pub fn role_of(registry: &Registry, v: VarId) -> crate::roles::RoleId {
    match registry.key(v) {
        AtomicKey::Modal { role, .. } => role,
        AtomicKey::Prop(_) => unreachable!("role_of only ever called on a box/dia variable"),
    }
}

/// §4.7 no-good minimization, shared by the box- and diamond-triggered
/// call sites in both engines. `minimal` starts as the context already
/// conjoined with the literal that triggered falsity (so it may or may not
/// already be false); `candidates` are scanned left-to-right, each tested by
/// conjoining `test(v)` into a running copy, restarting the scan (with a
/// shrinking upper bound) every time one flips the running BDD to false.
/// Returns the final `minimal` BDD and the candidates that were added, in
/// the order they were found responsible.
pub fn minimize(
    mut minimal: Bdd,
    candidates: &[VarId],
    mut test: impl FnMut(VarId) -> Bdd,
) -> (Bdd, Vec<VarId>) {
    let mut added = Vec::new();
    let mut end = candidates.len();
    loop {
        if minimal.is_false() {
            break;
        }
        let mut running = minimal.clone();
        let mut progressed = false;
        for (i, v) in candidates[..end].iter().enumerate() {
            running = running.and(&test(*v));
            if running.is_false() {
                minimal = minimal.and(&test(*v));
                added.push(*v);
                end = i;
                progressed = true;
                break;
            }
        }
        if !progressed {
            break;
        }
    }
    (minimal, added)
}

/// Grows `responsible_vars` to a fixed point: any variable in `box_vars` or
/// `dia_vars` whose `children` intersects the current responsible set is
/// itself added, repeating until a full pass adds nothing. A candidate whose
/// children *don't* intersect is tallied as "ignored" (§9 open question: the
/// source's `diaIt` guard is preserved observably here by checking every
/// candidate on every pass, not only ones newly reachable).
///
/// `general` selects which counter the ignored tally lands in: `true` at the
/// two call sites that mirror the source's "general case" block (a modal
/// jump whose recursive satisfiability check --- or its unsat-cache
/// shortcut --- came back false), landing in
/// `num_res_vars_ignored_from_general`; `false` elsewhere, split by list into
/// `num_res_vars_ignored_from_box`/`_from_dia`.
pub fn close_responsible_vars(
    responsible_vars: &mut HashSet<VarId>,
    box_vars: &[VarId],
    dia_vars: &[VarId],
    registry: &Registry,
    s4: bool,
    general: bool,
    stats: &mut Stats,
) {
    loop {
        let mut changed = false;
        for &v in box_vars {
            if responsible_vars.contains(&v) {
                continue;
            }
            if registry.children(v, s4).iter().any(|c| responsible_vars.contains(c)) {
                responsible_vars.insert(v);
                changed = true;
            } else if general {
                stats.num_res_vars_ignored_from_general += 1;
            } else {
                stats.num_res_vars_ignored_from_box += 1;
            }
        }
        for &v in dia_vars {
            if responsible_vars.contains(&v) {
                continue;
            }
            if registry.children(v, s4).iter().any(|c| responsible_vars.contains(c)) {
                responsible_vars.insert(v);
                changed = true;
            } else if general {
                stats.num_res_vars_ignored_from_general += 1;
            } else {
                stats.num_res_vars_ignored_from_dia += 1;
            }
        }
        if !changed {
            break;
        }
    }
}
