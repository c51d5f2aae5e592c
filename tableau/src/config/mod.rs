/*!
Configuration of a [crate::context::Context].

Grounded in `otter_sat::config::Config`: a single plain struct of engine
options owned by the context and consulted throughout a decision, rather
than scattered globals (see spec.md §9, "Replacing global state"). Unlike
the teacher's `Config`, there is no [generic `ConfigOption` with
min/max/state bounds --- every flag here is a CLI boolean or a single size
bound (§5's `max_cache_size`), so the extra machinery the teacher needs for
numeric solver tunables (VSIDS variants, Luby restarts, polarity leaning)
has no counterpart; see DESIGN.md for this simplification.

Every field maps 1:1 onto a flag in spec.md §6.
*/

use crate::caches::UnsatCacheKind;

/// Engine configuration for one decision or classification run.
#[derive(Clone, Debug)]
pub struct Config {
    /// `-g`: read a second input line as global assumptions (Γ).
    pub global_assumptions: bool,

    /// `-v`: print the verbose statistics line after the report.
    pub verbose: bool,

    /// `-s4`: decide in S4 (reflexive-transitive) rather than K.
    pub s4: bool,

    /// `-rtol`: pick the lexicographically last (right-to-left) satisfying
    /// path at each saturation step, rather than the first.
    pub right_to_left: bool,

    /// `-reorder`: enable dynamic BDD variable reordering. Accepted but a
    /// documented no-op --- `biodivine_lib_bdd` does not expose dynamic
    /// reordering (see SPEC_FULL.md and DESIGN.md).
    pub reorder: bool,

    /// `-onlygamma`: restrict reordering to the Γ-construction phase. Also
    /// a no-op for the same reason as `reorder`; accepted for CLI fidelity.
    pub only_gamma: bool,

    /// `-norm`: coalesce registered box variables that unbox to the same
    /// BDD (semantic equivalence), reassigning the later box's variable to
    /// the earlier one.
    pub normalize: bool,

    /// `-classify`: perform ontology classification instead of a single
    /// provability decision.
    pub classify: bool,

    /// Which unsat-cache flavor is active: default, `-buc`, `-suc`, or
    /// `-nuc` (none). See [crate::caches::UnsatCacheKind].
    pub unsat_cache_kind: UnsatCacheKind,

    /// §5: FIFO bound shared by the sat cache, conditional-sat cache, the
    /// default unsat cache, and the saturation-unsat cache.
    pub max_cache_size: usize,
}

impl Default for Config {
    /// Mirrors the source's own defaults: no global assumptions, K (not
    /// S4), left-to-right valuation, no reordering, no normalization, the
    /// default (non-`-buc`, non-`-suc`) unsat cache, `maxCacheSize = 8000`.
    fn default() -> Self {
        Config {
            global_assumptions: false,
            verbose: false,
            s4: false,
            right_to_left: false,
            reorder: false,
            only_gamma: false,
            normalize: false,
            classify: false,
            unsat_cache_kind: UnsatCacheKind::Default,
            max_cache_size: 8000,
        }
    }
}
