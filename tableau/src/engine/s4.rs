/*!
The S4 engine (§4.8): as K, plus greedy surface-box unboxing and a
per-branch "permanent facts" accumulator carrying reflexive-transitive
consequences into every successor world. Grounded in `isSatisfiableS4`/
`refineAndRecurseS4` in `bddtab.cpp`.
*/

use std::collections::{HashMap, HashSet};

use biodivine_lib_bdd::Bdd;

use crate::bdd::Manager;
use crate::caches::{Caches, UnsatCacheKind};
use crate::engine::k::Outcome;
use crate::engine::{close_responsible_vars, extract_satisfying_modal_vars, minimize, ModalCache, Stats};
use crate::registry::{Registry, VarId};

pub struct S4Engine<'a> {
    pub registry: &'a Registry,
    pub manager: &'a Manager,
    pub gamma_bdd: Bdd,
    pub right_to_left: bool,
    pub caches: &'a mut Caches,
    pub modal: &'a mut ModalCache<'a>,
    pub stats: Stats,
    dependent_bdds: HashSet<Bdd>,
    ever_assumed_sat_bdds: HashSet<Bdd>,
}

impl<'a> S4Engine<'a> {
    pub fn new(
        registry: &'a Registry,
        manager: &'a Manager,
        gamma_bdd: Bdd,
        right_to_left: bool,
        caches: &'a mut Caches,
        modal: &'a mut ModalCache<'a>,
    ) -> S4Engine<'a> {
        S4Engine {
            registry,
            manager,
            gamma_bdd,
            right_to_left,
            caches,
            modal,
            stats: Stats::default(),
            dependent_bdds: HashSet::new(),
            ever_assumed_sat_bdds: HashSet::new(),
        }
    }

    fn literal(&self, v: VarId, val: bool) -> Bdd {
        if val {
            self.manager.ithvar(v)
        } else {
            self.manager.nithvar(v)
        }
    }

    fn sigma_cube(&self, path: &[(VarId, bool)]) -> Bdd {
        let mut cube = self.manager.bdd_true();
        for &(v, val) in path {
            cube = cube.and(&self.literal(v, val));
        }
        cube
    }

    /// Top-level entry: reflexive, so the initial permanent-facts context is
    /// `bddtrue` and no box variable is yet known permanent.
    pub fn is_sat(&mut self, b: &Bdd) -> Outcome {
        let perm_facts = self.manager.bdd_true();
        self.is_sat_with_permanents(b, &perm_facts, &HashSet::new())
    }

    fn is_sat_with_permanents(
        &mut self,
        b: &Bdd,
        perm_facts: &Bdd,
        perm_box_vars: &HashSet<VarId>,
    ) -> Outcome {
        self.stats.enter_frame();
        let outcome = self.is_sat_inner(b, perm_facts, perm_box_vars);
        self.stats.exit_frame();
        outcome
    }

    fn is_sat_inner(
        &mut self,
        b: &Bdd,
        perm_facts: &Bdd,
        perm_box_vars: &HashSet<VarId>,
    ) -> Outcome {
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
        if *b == self.manager.bdd_true() {
            self.stats.total_satisfiable_modal_jumps += 1;
            return Outcome::new_sat(HashSet::new());
        }
        if *b == self.manager.bdd_false() {
            return Outcome::new_unsat(HashSet::new());
        }

        let path = self
            .manager
            .satone(b, self.right_to_left)
            .expect("b is neither bddtrue nor bddfalse, so a path exists");
        let (box_vars, dia_vars) = extract_satisfying_modal_vars(&path, self.registry);

        if dia_vars.is_empty() {
            self.stats.total_satisfiable_modal_jumps += 1;
            return Outcome::new_sat(HashSet::new());
        }

        log::debug!(
            "S4 modal jump at depth {}: {} boxes ({} new), {} diamonds",
            self.stats.depth,
            box_vars.len(),
            box_vars.iter().filter(|v| !perm_box_vars.contains(v)).count(),
            dia_vars.len()
        );
        self.dependent_bdds.insert(b.clone());
        let outcome = self.unbox_then_jump(b, &path, &box_vars, &dia_vars, perm_facts, perm_box_vars);
        self.dependent_bdds.remove(b);
        outcome
    }

    fn unbox_then_jump(
        &mut self,
        b: &Bdd,
        path: &[(VarId, bool)],
        box_vars: &[VarId],
        dia_vars: &[VarId],
        perm_facts: &Bdd,
        perm_box_vars: &HashSet<VarId>,
    ) -> Outcome {
        let new_box_vars: Vec<VarId> = box_vars
            .iter()
            .copied()
            .filter(|v| !perm_box_vars.contains(v))
            .collect();

        let mut sat_val = self.sigma_cube(path);
        let mut perm_facts_acc = perm_facts.clone();
        let mut perm_box_vars_acc = perm_box_vars.clone();
        let mut processed_new: Vec<VarId> = Vec::new();

        for &v in &new_box_vars {
            let lit = self.modal.unbox_s4(v);
            sat_val = sat_val.and(&lit);
            perm_facts_acc = perm_facts_acc.and(&lit).and(&self.manager.ithvar(v));
            perm_box_vars_acc.insert(v);
            processed_new.push(v);
            if sat_val.is_false() {
                self.stats.num_false_from_box += 1;
                return self.minimize_unbox_failure(b, path, &processed_new, perm_facts, perm_box_vars);
            }
        }

        if !processed_new.is_empty() {
            let result = self.is_sat_with_permanents(&sat_val, &perm_facts_acc, &perm_box_vars_acc);
            if !result.sat {
                let mut responsible: HashSet<VarId> = path
                    .iter()
                    .map(|(v, _)| *v)
                    .filter(|v| result.responsible_vars.contains(v))
                    .collect();
                responsible.extend(result.responsible_vars.iter().copied());
                close_responsible_vars(&mut responsible, &processed_new, &[], self.registry, true, false, &mut self.stats);
                return self.finish_refine(b, path, responsible, perm_facts, perm_box_vars);
            }
            return self.modal_jump_phase(
                b,
                dia_vars,
                sat_val,
                perm_facts_acc,
                perm_box_vars_acc,
                result.assumed_sat_bdds,
            );
        }

        self.modal_jump_phase(b, dia_vars, sat_val, perm_facts_acc, perm_box_vars_acc, HashSet::new())
    }

    fn minimize_unbox_failure(
        &mut self,
        b: &Bdd,
        path: &[(VarId, bool)],
        processed_new: &[VarId],
        perm_facts: &Bdd,
        perm_box_vars: &HashSet<VarId>,
    ) -> Outcome {
        let pivot = *processed_new.last().expect("a box triggered this failure");
        let pivot_lit = self.modal.unbox_s4(pivot);
        let context = perm_facts.clone().and(&self.sigma_cube(path)).and(&pivot_lit);
        let earlier = &processed_new[..processed_new.len() - 1];

        let modal = &mut self.modal;
        let (min_box_vars_bdd, added) = minimize(context, earlier, |v| modal.unbox_s4(v));

        let mut responsible: HashSet<VarId> = added.iter().copied().collect();
        responsible.insert(pivot);

        // Phase 2: re-minimize over every var in the satisfying path, not
        // just the new box vars, appending any further literal necessary to
        // keep the conjunction false.
        let path_vars: Vec<VarId> = path.iter().map(|&(v, _)| v).collect();
        let path_vals: HashMap<VarId, bool> = path.iter().copied().collect();
        let (_, extra) = minimize(min_box_vars_bdd, &path_vars, |v| self.literal(v, path_vals[&v]));
        for v in extra {
            responsible.insert(v);
        }

        self.finish_refine(b, path, responsible, perm_facts, perm_box_vars)
    }

    fn modal_jump_phase(
        &mut self,
        b: &Bdd,
        dia_vars: &[VarId],
        context: Bdd,
        perm_facts: Bdd,
        perm_box_vars: HashSet<VarId>,
        mut assumed_sat_bdds: HashSet<Bdd>,
    ) -> Outcome {
        for &d in dia_vars {
            self.stats.total_modal_jumps_explored += 1;
            let undiamond = self.modal.undiamond(d, &mut self.stats);
            let mut m = self.caches.unsat_bdd.clone().and(&self.gamma_bdd).and(&perm_facts).and(&undiamond);
            let _ = &context;

            if m.is_false() {
                self.stats.num_false_from_dia += 1;
                return self.minimize_jump_failure(b, d, &perm_facts, &perm_box_vars);
            }
            if self.dependent_bdds.contains(&m) {
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
                return self.finish_refine_dia(b, d, &perm_box_vars, responsible, &perm_facts);
            }
            if self.dependent_bdds.contains(&m) {
                self.stats.loops_detected += 1;
                assumed_sat_bdds.insert(m.clone());
                self.ever_assumed_sat_bdds.insert(m);
                continue;
            }

            let result = self.is_sat_with_permanents(&m, &perm_facts, &perm_box_vars);
            if !result.sat {
                let mut responsible = cache_res_vars;
                responsible.extend(result.responsible_vars);
                responsible.insert(d);
                return self.finish_refine_dia(b, d, &perm_box_vars, responsible, &perm_facts);
            }
            assumed_sat_bdds.extend(result.assumed_sat_bdds);
        }

        assumed_sat_bdds.remove(b);
        if self.ever_assumed_sat_bdds.contains(b) {
            self.caches.confirm_sat_assumption(b);
        }
        self.caches.cache_sat(b.clone(), &assumed_sat_bdds);
        Outcome::new_sat(assumed_sat_bdds)
    }

    /// The undiamonded successor was false before `perm_facts` was even
    /// reconstructed from individual permanent box vars: minimize over those
    /// vars directly, same shape as the default unsat-cache minimization in
    /// [Self::modal_jump_phase] below, but testing `unbox_s4(v) & ithvar(v)`
    /// since `perm_facts` isn't atomic.
    fn minimize_jump_failure(
        &mut self,
        b: &Bdd,
        d: VarId,
        perm_facts: &Bdd,
        perm_box_vars: &HashSet<VarId>,
    ) -> Outcome {
        let undiamond = self.modal.undiamond(d, &mut self.stats);
        let context = self.caches.unsat_bdd.clone().and(&self.gamma_bdd).and(&undiamond);
        let candidates: Vec<VarId> = perm_box_vars.iter().copied().collect();

        let manager = self.manager;
        let modal = &mut self.modal;
        let (_, added) = minimize(context, &candidates, |v| modal.unbox_s4(v).and(&manager.ithvar(v)));

        self.stats.num_res_vars_ignored_from_dia += (candidates.len() - added.len()) as u64;
        let mut responsible: HashSet<VarId> = added.iter().copied().collect();
        responsible.insert(d);
        self.finish_refine_dia(b, d, perm_box_vars, responsible, perm_facts)
    }

    /// §4.5/§4.8: no `existsDia` term --- S4 never wires the mono-modal
    /// sentinel. The learned no-good is `¬(d-literal ∧ ⋀ responsible box
    /// literals)`.
    fn finish_refine_dia(
        &mut self,
        b: &Bdd,
        d: VarId,
        perm_box_vars: &HashSet<VarId>,
        responsible: HashSet<VarId>,
        perm_facts: &Bdd,
    ) -> Outcome {
        let mut unsat_lits = self.manager.nithvar(d);
        for &v in perm_box_vars {
            if responsible.contains(&v) {
                unsat_lits = unsat_lits.and(&self.manager.ithvar(v));
            }
        }
        let unsat_bdd = unsat_lits.not();
        self.finish_refine_core(b, unsat_bdd, responsible, perm_facts, perm_box_vars)
    }

    fn finish_refine(
        &mut self,
        b: &Bdd,
        path: &[(VarId, bool)],
        responsible: HashSet<VarId>,
        perm_facts: &Bdd,
        perm_box_vars: &HashSet<VarId>,
    ) -> Outcome {
        let mut unsat_lits = self.manager.bdd_true();
        for &(v, val) in path {
            if responsible.contains(&v) {
                unsat_lits = unsat_lits.and(&self.literal(v, val));
            }
        }
        let unsat_bdd = unsat_lits.not();
        self.finish_refine_core(b, unsat_bdd, responsible, perm_facts, perm_box_vars)
    }

    fn finish_refine_core(
        &mut self,
        b: &Bdd,
        unsat_bdd: Bdd,
        responsible_vars: HashSet<VarId>,
        perm_facts: &Bdd,
        perm_box_vars: &HashSet<VarId>,
    ) -> Outcome {
        if self.caches.kind != UnsatCacheKind::None {
            self.caches.cache_unsat(responsible_vars.clone(), unsat_bdd.clone());
        }
        self.stats.total_bdd_refinements += 1;
        log::debug!(
            "S4 refining at depth {} with {} responsible variables",
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

        let result = self.is_sat_with_permanents(&refined, perm_facts, perm_box_vars);
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
