/*!
The four result caches described in DATA MODEL §3, plus the "temporary"
conditional-sat cache that backs the cycle-assumption discipline (§4.6).

Grounded in the globals `satCache`/`satCacheDeque`, `unsatCache`/
`unsatCacheDeque`, `unsatCacheBDD`, `saturationUnsatCache`/
`saturationUnsatCacheDeque`, and `tempSatCaches`. Every bounded cache here
uses the same FIFO-by-insertion-order eviction as the source's parallel
`std::deque`s: a `VecDeque` of keys tracks insertion order, and eviction
pops its front and removes the corresponding entry.
*/

use std::collections::{HashMap, HashSet, VecDeque};

use biodivine_lib_bdd::Bdd;

use crate::registry::VarId;

/// Which flavor of unsat cache is active for a decision --- exactly one is
/// ever consulted per spec.md §3/§9 ("only one flavor is intended active at
/// a time"), selected by `-buc`/`-suc`/neither, or none at all under `-nuc`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnsatCacheKind {
    /// No unsat cache (`-nuc`).
    None,
    /// Default flavor: a map from a sorted variable-support vector to a
    /// learned no-good BDD.
    Default,
    /// `-buc`: a single BDD, the conjunction of every learned no-good.
    SingleBdd,
    /// `-suc`: keyed by the post-modal-jump BDD itself, mapping to the
    /// variables responsible for its unsatisfiability.
    Saturation,
}

/// `satCache`/`satCacheDeque`: BDDs known satisfiable under no assumptions.
#[derive(Default)]
pub struct SatCache {
    members: HashSet<Bdd>,
    order: VecDeque<Bdd>,
    pub adds: u64,
    pub hits: u64,
}

impl SatCache {
    pub fn contains(&mut self, b: &Bdd) -> bool {
        let hit = self.members.contains(b);
        if hit {
            self.hits += 1;
        }
        hit
    }

    /// Unconditional insert with FIFO eviction once `max_size` is reached.
    pub fn insert(&mut self, b: Bdd, max_size: usize) {
        if self.members.contains(&b) {
            return;
        }
        if self.members.len() >= max_size {
            if let Some(evicted) = self.order.pop_front() {
                self.members.remove(&evicted);
            }
        }
        self.order.push_back(b.clone());
        self.members.insert(b);
        self.adds += 1;
    }
}

/// `tempSatCaches`: sat results contingent on confirming that certain BDDs
/// (assumed sat to break a cycle) are themselves eventually sat.
#[derive(Default)]
pub struct CondSatCache {
    /// `(assumptions, bdd)` pairs, in insertion order (a `std::list` in the
    /// source; order doesn't matter for correctness here, only that entries
    /// can be removed from the middle, which a `Vec` supports via `retain`).
    entries: Vec<(HashSet<Bdd>, Bdd)>,
    pub adds: u64,
    pub confirmed: u64,
    pub rejected: u64,
}

impl CondSatCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, assumptions: HashSet<Bdd>, b: Bdd) {
        self.entries.push((assumptions, b));
        self.adds += 1;
    }

    /// `confirmSatAssumption(b)`: erase `b` from every entry's assumption
    /// set, returning the BDDs of entries whose assumptions became empty
    /// (the caller promotes these to [SatCache]).
    pub fn confirm(&mut self, b: &Bdd) -> Vec<Bdd> {
        let mut promoted = Vec::new();
        self.entries.retain_mut(|(assumptions, bdd)| {
            assumptions.remove(b);
            if assumptions.is_empty() {
                promoted.push(bdd.clone());
                self.confirmed += 1;
                false
            } else {
                true
            }
        });
        promoted
    }

    /// `rejectSatAssumption(b)`: drop every entry that assumed `b`, since
    /// `b` was found unsatisfiable.
    pub fn reject(&mut self, b: &Bdd) {
        let before = self.entries.len();
        self.entries.retain(|(assumptions, _)| !assumptions.contains(b));
        self.rejected += (before - self.entries.len()) as u64;
    }
}

/// `unsatCache`/`unsatCacheDeque` (default flavor): sorted variable-support
/// vector -> learned no-good BDD.
#[derive(Default)]
pub struct UnsatCache {
    map: HashMap<Vec<VarId>, Bdd>,
    order: VecDeque<Vec<VarId>>,
}

impl UnsatCache {
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<VarId>, &Bdd)> {
        self.map.iter()
    }

    pub fn insert(&mut self, mut vars: Vec<VarId>, b: Bdd, max_size: usize) {
        vars.sort_unstable();
        if self.map.contains_key(&vars) {
            return;
        }
        if self.map.len() >= max_size {
            if let Some(evicted) = self.order.pop_front() {
                self.map.remove(&evicted);
            }
        }
        self.order.push_back(vars.clone());
        self.map.insert(vars, b);
    }
}

/// `saturationUnsatCache`/`saturationUnsatCacheDeque` (`-suc` flavor):
/// post-modal-jump BDD -> the variables responsible for its unsat result.
#[derive(Default)]
pub struct SaturationUnsatCache {
    map: HashMap<Bdd, HashSet<VarId>>,
    order: VecDeque<Bdd>,
}

impl SaturationUnsatCache {
    pub fn get(&self, b: &Bdd) -> Option<&HashSet<VarId>> {
        self.map.get(b)
    }

    pub fn insert(&mut self, b: Bdd, vars: HashSet<VarId>, max_size: usize) {
        if self.map.len() >= max_size {
            if let Some(evicted) = self.order.pop_front() {
                self.map.remove(&evicted);
            }
        }
        self.order.push_back(b.clone());
        self.map.insert(b, vars);
    }
}

/// The full cache bundle an engine owns for one top-level decision. Cleared
/// between top-level invocations but not between the modal jumps of a
/// single decision (spec.md DATA MODEL "Lifetimes").
pub struct Caches {
    pub sat: SatCache,
    pub cond_sat: CondSatCache,
    pub unsat: UnsatCache,
    /// `unsatCacheBDD`: the conjunction of every learned no-good under the
    /// `-buc` flavor; `bddtrue` otherwise (an always-true, no-op conjunct),
    /// matching the source initializing it to `bddtrue` regardless of flavor
    /// and conjoining it into every world unconditionally.
    pub unsat_bdd: Bdd,
    pub saturation_unsat: SaturationUnsatCache,
    pub kind: UnsatCacheKind,
    pub max_cache_size: usize,

    pub unsat_adds: u64,
    pub unsat_hits: u64,
}

impl Caches {
    pub fn new(kind: UnsatCacheKind, max_cache_size: usize, bdd_true: Bdd) -> Caches {
        Caches {
            sat: SatCache::default(),
            cond_sat: CondSatCache::default(),
            unsat: UnsatCache::default(),
            unsat_bdd: bdd_true,
            saturation_unsat: SaturationUnsatCache::default(),
            kind,
            max_cache_size,
            unsat_adds: 0,
            unsat_hits: 0,
        }
    }

    /// `cacheSat(b, assumedSatBDDs)`.
    pub fn cache_sat(&mut self, b: Bdd, assumed_sat_bdds: &HashSet<Bdd>) {
        if assumed_sat_bdds.is_empty() {
            self.sat.insert(b, self.max_cache_size);
        } else if self.cond_sat.len() < self.max_cache_size {
            self.cond_sat.push(assumed_sat_bdds.clone(), b);
        }
    }

    /// `cacheUnsat(vars, b)`.
    pub fn cache_unsat(&mut self, vars: HashSet<VarId>, b: Bdd) {
        match self.kind {
            UnsatCacheKind::None => return,
            UnsatCacheKind::SingleBdd => {
                self.unsat_bdd = self.unsat_bdd.and(&b);
            }
            UnsatCacheKind::Saturation => {
                self.saturation_unsat.insert(b, vars, self.max_cache_size);
            }
            UnsatCacheKind::Default => {
                let ordered: Vec<VarId> = vars.into_iter().collect();
                self.unsat.insert(ordered, b, self.max_cache_size);
            }
        }
        self.unsat_adds += 1;
    }

    pub fn confirm_sat_assumption(&mut self, b: &Bdd) {
        for promoted in self.cond_sat.confirm(b) {
            self.sat.insert(promoted, self.max_cache_size);
        }
    }

    pub fn reject_sat_assumption(&mut self, b: &Bdd) {
        self.cond_sat.reject(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biodivine_lib_bdd::BddVariableSetBuilder;

    fn two_bdds() -> (Bdd, Bdd, Bdd) {
        let mut builder = BddVariableSetBuilder::new();
        let v0 = builder.make_variable("v0");
        let universe = builder.build();
        (
            universe.mk_true(),
            universe.mk_literal(v0, true),
            universe.mk_literal(v0, false),
        )
    }

    #[test]
    fn sat_cache_evicts_fifo() {
        let (_t, a, b) = two_bdds();
        let mut cache = SatCache::default();
        cache.insert(a.clone(), 1);
        cache.insert(b.clone(), 1);
        assert!(!cache.contains(&a));
        assert!(cache.contains(&b));
    }

    #[test]
    fn cond_sat_promotes_on_confirm() {
        let (t, a, b) = two_bdds();
        let mut cond = CondSatCache::default();
        let mut assumptions = HashSet::new();
        assumptions.insert(a.clone());
        cond.push(assumptions, b.clone());
        assert!(cond.confirm(&a).contains(&b));
        assert!(cond.is_empty());
        let _ = t;
    }

    #[test]
    fn cond_sat_drops_on_reject() {
        let (_t, a, b) = two_bdds();
        let mut cond = CondSatCache::default();
        let mut assumptions = HashSet::new();
        assumptions.insert(a.clone());
        cond.push(assumptions, b);
        cond.reject(&a);
        assert!(cond.is_empty());
    }
}
