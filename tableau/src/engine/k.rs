/*!
The K engine (§4.4): recursive modal-jump satisfiability with refinement,
no-good minimization, and cycle assumptions. Grounded in `isSatisfiableK`/
`refineAndRecurse` in `bddtab.cpp`.
*/

use std::collections::HashSet;

use biodivine_lib_bdd::Bdd;

use crate::bdd::Manager;
use crate::caches::{Caches, UnsatCacheKind};
use crate::engine::{close_responsible_vars, extract_satisfying_modal_vars, minimize, role_of, ModalCache, Stats};
use crate::registry::{Registry, VarId};
use crate::roles::RoleId;

/// Outcome of one `is_sat` call: whether the BDD is satisfiable, the
/// variables responsible if not, and the BDDs assumed sat (locally) to break
/// a cycle on the path that led here.
pub struct Outcome {
    pub sat: bool,
    pub responsible_vars: HashSet<VarId>,
    pub assumed_sat_bdds: HashSet<Bdd>,
}

impl Outcome {
    pub(crate) fn new_sat(assumed_sat_bdds: HashSet<Bdd>) -> Outcome {
        Outcome {
            sat: true,
            responsible_vars: HashSet::new(),
            assumed_sat_bdds,
        }
    }

    pub(crate) fn new_unsat(responsible_vars: HashSet<VarId>) -> Outcome {
        Outcome {
            sat: false,
            responsible_vars,
            assumed_sat_bdds: HashSet::new(),
        }
    }
}

pub struct KEngine<'a> {
    pub registry: &'a Registry,
    pub manager: &'a Manager,
    pub gamma_bdd: Bdd,
    pub num_roles: usize,
    pub right_to_left: bool,
    pub caches: &'a mut Caches,
    pub modal: &'a mut ModalCache<'a>,
    pub stats: Stats,
    dependent_bdds: HashSet<Bdd>,
    ever_assumed_sat_bdds: HashSet<Bdd>,
}

impl<'a> KEngine<'a> {
    pub fn new(
        registry: &'a Registry,
        manager: &'a Manager,
        gamma_bdd: Bdd,
        num_roles: usize,
        right_to_left: bool,
        caches: &'a mut Caches,
        modal: &'a mut ModalCache<'a>,
    ) -> KEngine<'a> {
        KEngine {
            registry,
            manager,
            gamma_bdd,
            num_roles,
            right_to_left,
            caches,
            modal,
            stats: Stats::default(),
            dependent_bdds: HashSet::new(),
            ever_assumed_sat_bdds: HashSet::new(),
        }
    }

    /// `is_sat_K(B)`.
    pub fn is_sat(&mut self, b: &Bdd) -> Outcome {
        self.stats.enter_frame();
        let outcome = self.is_sat_inner(b);
        self.stats.exit_frame();
        outcome
    }

    fn is_sat_inner(&mut self, b: &Bdd) -> Outcome {
        // 1. Cache lookup.
        if self.caches.sat.contains(b) {
            log::trace!("sat cache hit at depth {}", self.stats.depth);
            self.stats.total_satisfiable_modal_jumps += 1;
            return Outcome::new_sat(HashSet::new());
        }
        if self.caches.kind == UnsatCacheKind::Saturation {
            if let Some(vars) = self.caches.saturation_unsat.get(b) {
                log::trace!("saturation-unsat cache hit at depth {}", self.stats.depth);
                self.caches.unsat_hits += 1;
                return Outcome::new_unsat(vars.clone());
            }
        }

        // 2. Terminal.
        if *b == self.manager.bdd_true() {
            self.stats.total_satisfiable_modal_jumps += 1;
            return Outcome::new_sat(HashSet::new());
        }
        if *b == self.manager.bdd_false() {
            return Outcome::new_unsat(HashSet::new());
        }

        // 3/4. Pick one assignment, split into box/dia obligations.
        let path = self
            .manager
            .satone(b, self.right_to_left)
            .expect("b is neither bddtrue nor bddfalse, so a path exists");
        let (box_vars, dia_vars) = extract_satisfying_modal_vars(&path, self.registry);

        // 5. No diamond obligations: a saturated open branch.
        if dia_vars.is_empty() {
            self.stats.total_satisfiable_modal_jumps += 1;
            return Outcome::new_sat(HashSet::new());
        }

        // 6. Record on the current path.
        log::debug!(
            "modal jump at depth {}: {} boxes, {} diamonds",
            self.stats.depth,
            box_vars.len(),
            dia_vars.len()
        );
        self.dependent_bdds.insert(b.clone());
        let outcome = self.explore_roles(b, &box_vars, &dia_vars);
        self.dependent_bdds.remove(b);
        outcome
    }

    fn explore_roles(&mut self, b: &Bdd, box_vars: &[VarId], dia_vars: &[VarId]) -> Outcome {
        let mut assumed_sat_bdds: HashSet<Bdd> = HashSet::new();

        for role_idx in 0..self.num_roles {
            let role = RoleId::from_index(role_idx);
            let box_vars_role: Vec<VarId> = box_vars
                .iter()
                .copied()
                .filter(|&v| role_of(self.registry, v) == role)
                .collect();
            let dia_vars_role: Vec<VarId> = dia_vars
                .iter()
                .copied()
                .filter(|&v| role_of(self.registry, v) == role)
                .collect();

            // 7a. Build the unboxed context for this role, incrementally.
            let mut unboxed = self.caches.unsat_bdd.clone().and(&self.gamma_bdd);
            let mut processed: Vec<VarId> = Vec::new();
            let mut failed = false;
            for &bv in &box_vars_role {
                let lit = self.modal.unbox(bv, &mut self.stats);
                unboxed = unboxed.and(&lit);
                processed.push(bv);
                if unboxed.is_false() {
                    failed = true;
                    break;
                }
            }
            if failed {
                self.stats.num_false_from_box += 1;
                return self.minimize_box_failure(b, &processed);
            }

            // 7b. Modal jumps for each diamond of this role.
            for &d in &dia_vars_role {
                self.stats.total_modal_jumps_explored += 1;
                let undiamond = self.modal.undiamond(d, &mut self.stats);
                let mut m = unboxed.and(&undiamond);

                if m.is_false() {
                    self.stats.num_false_from_dia += 1;
                    let mut candidates = processed.clone();
                    candidates.push(d);
                    return self.minimize_dia_failure(b, &candidates, d);
                }

                if self.dependent_bdds.contains(&m) {
                    log::trace!("cycle assumed sat at depth {}", self.stats.depth);
                    self.stats.loops_detected += 1;
                    assumed_sat_bdds.insert(m.clone());
                    self.ever_assumed_sat_bdds.insert(m);
                    continue;
                }

                let mut cache_res_vars: HashSet<VarId> = HashSet::new();
                if self.caches.kind == UnsatCacheKind::Default {
                    let support = self.manager.support(&m);
                    let stale: Vec<(Vec<VarId>, Bdd)> = self
                        .caches
                        .unsat
                        .iter()
                        .filter(|(vars, _)| vars.iter().all(|v| support.contains(v)))
                        .map(|(vars, bdd)| (vars.clone(), bdd.clone()))
                        .collect();
                    for (vars, learned) in stale {
                        m = m.and(&learned);
                        cache_res_vars.extend(vars);
                        self.caches.unsat_hits += 1;
                    }
                }

                if m.is_false() {
                    let mut responsible = cache_res_vars;
                    responsible.insert(d);
                    close_responsible_vars(&mut responsible, &processed, &[d], self.registry, false, true, &mut self.stats);
                    return self.refine_and_recurse(b, d, &processed, responsible);
                }
                if self.dependent_bdds.contains(&m) {
                    self.stats.loops_detected += 1;
                    assumed_sat_bdds.insert(m.clone());
                    self.ever_assumed_sat_bdds.insert(m);
                    continue;
                }

                let result = self.is_sat(&m);
                if !result.sat {
                    let mut responsible = cache_res_vars;
                    responsible.extend(result.responsible_vars);
                    responsible.insert(d);
                    close_responsible_vars(&mut responsible, &processed, &[d], self.registry, false, true, &mut self.stats);
                    return self.refine_and_recurse(b, d, &processed, responsible);
                }
                assumed_sat_bdds.extend(result.assumed_sat_bdds);
            }
        }

        // 8. All jumps sat.
        assumed_sat_bdds.remove(b);
        if self.ever_assumed_sat_bdds.contains(b) {
            self.caches.confirm_sat_assumption(b);
        }
        self.caches.cache_sat(b.clone(), &assumed_sat_bdds);
        Outcome::new_sat(assumed_sat_bdds)
    }

    /// A box in this role's unboxing made the context false before any
    /// diamond was even considered: minimize over the already-unboxed boxes.
    fn minimize_box_failure(&mut self, b: &Bdd, processed: &[VarId]) -> Outcome {
        let pivot = *processed.last().expect("a box triggered this failure");
        let pivot_lit = self.modal.unbox(pivot, &mut self.stats);
        let context = self.caches.unsat_bdd.clone().and(&self.gamma_bdd).and(&pivot_lit);
        let earlier = &processed[..processed.len() - 1];

        let modal = &mut self.modal;
        let stats = &mut self.stats;
        let (_, added) = minimize(context, earlier, |v| modal.unbox(v, stats));

        self.stats.num_res_vars_ignored_from_box += (earlier.len() - added.len()) as u64;
        let mut responsible: HashSet<VarId> = added.iter().copied().collect();
        responsible.insert(pivot);

        let mut unsat_lits = self.manager.ithvar(pivot);
        for &v in &added {
            unsat_lits = unsat_lits.and(&self.manager.ithvar(v));
        }
        unsat_lits = unsat_lits.and(&self.manager.ithvar(Registry::EXISTS_DIA));
        let unsat_bdd = unsat_lits.not();

        self.finish_refine(b, unsat_bdd, responsible)
    }

    /// A diamond jump's undiamonded successor was false on construction:
    /// minimize over the boxes unboxed so far, with `d` as the pivot.
    fn minimize_dia_failure(&mut self, b: &Bdd, processed_with_d: &[VarId], d: VarId) -> Outcome {
        let undiamond_d = self.modal.undiamond(d, &mut self.stats);
        let context = self.gamma_bdd.clone().and(&undiamond_d);
        let box_candidates = &processed_with_d[..processed_with_d.len() - 1];

        let modal = &mut self.modal;
        let stats = &mut self.stats;
        let (_, added) = minimize(context, box_candidates, |v| modal.unbox(v, stats));

        self.stats.num_res_vars_ignored_from_dia += (box_candidates.len() - added.len()) as u64;
        let mut responsible: HashSet<VarId> = added.iter().copied().collect();
        responsible.insert(d);
        close_responsible_vars(&mut responsible, &added, &[d], self.registry, false, false, &mut self.stats);

        let mut unsat_lits = self.manager.nithvar(d);
        for &v in &added {
            unsat_lits = unsat_lits.and(&self.manager.ithvar(v));
        }
        unsat_lits = unsat_lits.and(&self.manager.ithvar(Registry::EXISTS_DIA));
        let unsat_bdd = unsat_lits.not();

        self.finish_refine(b, unsat_bdd, responsible)
    }

    /// The unsat-from-recursion path (§4.4 step 7.b, "If unsat"): build the
    /// learned no-good from the responsible set directly, as a conjunction
    /// of literals over `processed` (boxes) and `d` (the diamond), negated.
    fn refine_and_recurse(
        &mut self,
        b: &Bdd,
        d: VarId,
        processed: &[VarId],
        responsible: HashSet<VarId>,
    ) -> Outcome {
        let mut unsat_lits = self.manager.nithvar(d);
        for &v in processed {
            if responsible.contains(&v) {
                unsat_lits = unsat_lits.and(&self.manager.ithvar(v));
            }
        }
        unsat_lits = unsat_lits.and(&self.manager.ithvar(Registry::EXISTS_DIA));
        let unsat_bdd = unsat_lits.not();
        self.finish_refine(b, unsat_bdd, responsible)
    }

    /// §4.5: cache the learned no-good, conjoin it into `b`, and recurse on
    /// the residue (or settle immediately if the residue is trivial or a
    /// cycle).
    fn finish_refine(&mut self, b: &Bdd, unsat_bdd: Bdd, responsible_vars: HashSet<VarId>) -> Outcome {
        if self.caches.kind != UnsatCacheKind::None {
            self.caches.cache_unsat(responsible_vars.clone(), unsat_bdd.clone());
        }
        self.stats.total_bdd_refinements += 1;
        log::debug!(
            "refining at depth {} with {} responsible variables",
            self.stats.depth,
            responsible_vars.len()
        );

        let refined = b.and(&unsat_bdd);
        if refined.is_false() {
            self.stats.num_false_from_ref += 1;
            self.ever_assumed_sat_bdds.remove(b);
            self.caches.reject_sat_assumption(b);
            return Outcome::new_unsat(responsible_vars);
        }
        if self.dependent_bdds.contains(&refined) {
            self.stats.loops_detected += 1;
            let mut assumed = HashSet::new();
            assumed.insert(refined.clone());
            self.ever_assumed_sat_bdds.insert(refined);
            return Outcome::new_sat(assumed);
        }

        let result = self.is_sat(&refined);
        if !result.sat {
            self.caches.reject_sat_assumption(b);
            let mut resp = responsible_vars;
            resp.extend(result.responsible_vars);
            Outcome::new_unsat(resp)
        } else {
            if self.ever_assumed_sat_bdds.contains(b) {
                self.caches.confirm_sat_assumption(b);
            }
            Outcome::new_sat(result.assumed_sat_bdds)
        }
    }
}
