/*!
Report types for the two CLI modes: a single provability decision, and
ontology classification. Grounded in the output formatting of `main()` and
`performClassification()` in `bddtab.cpp`; the exact wording of every string
here is load-bearing (spec.md §6/§8 pins these literally).
*/

use crate::classify::ClassifyReport;
use crate::engine::Stats;

/// Which modal logic a decision was made in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Logic {
    K,
    S4,
}

impl std::fmt::Display for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Logic::K => write!(f, "K"),
            Logic::S4 => write!(f, "S4"),
        }
    }
}

/// The outcome of one `psi` (optionally with `gamma`) decision.
pub struct DecisionReport {
    pub logic: Logic,
    /// Whether `psi` is provable from `gamma`, i.e. whether `not_psi and
    /// gamma` is unsatisfiable.
    pub provable: bool,
    pub stats: Stats,
}

impl std::fmt::Display for DecisionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.provable {
            write!(
                f,
                "{}:Psi is Provable from Gamma [Not-psi and Gamma is Unsatisfiable]."
            , self.logic)
        } else {
            write!(
                f,
                "{}:Psi is Not provable from Gamma [Not-psi and Gamma is Satisfiable]."
            , self.logic)
        }
    }
}

/// §6: the verbose statistics line printed after the decision line under
/// `-v`, in `printSummaryStatistics()`'s exact key order.
pub struct VerboseStats<'a> {
    pub stats: &'a Stats,
    /// `false` for S4, where the three "ignored" counters have no
    /// counterpart (S4's responsible-variable closure does not distinguish
    /// box/dia candidates the way K's does).
    pub k_only: bool,
}

impl std::fmt::Display for VerboseStats<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.stats;
        let unsat_mj = s
            .total_modal_jumps_explored
            .saturating_sub(s.total_satisfiable_modal_jumps)
            .saturating_sub(s.loops_detected);
        write!(
            f,
            " ({sca}:{sch} / {uca}:{uch}) [V: {nv} - {nvr}, D: {d}/{md}, MJ: {mj}, \
             SatMJ: {smj}, UnsatMJ: {umj}, Ref: {ref_}, FF[]: {ffb}, FF<>: {ffd}, FFRef: {ffr}, ",
            sca = s.sat_cache_adds,
            sch = s.sat_cache_hits,
            uca = s.unsat_cache_adds,
            uch = s.unsat_cache_hits,
            nv = s.num_vars,
            nvr = s.num_vars_reduced,
            d = s.depth,
            md = s.max_depth,
            mj = s.total_modal_jumps_explored,
            smj = s.total_satisfiable_modal_jumps,
            umj = unsat_mj,
            ref_ = s.total_bdd_refinements,
            ffb = s.num_false_from_box,
            ffd = s.num_false_from_dia,
            ffr = s.num_false_from_ref,
        )?;
        if self.k_only {
            write!(
                f,
                "Ig[]: {ib}, Ig<>: {id}, IgGen: {ig}, ",
                ib = s.num_res_vars_ignored_from_box,
                id = s.num_res_vars_ignored_from_dia,
                ig = s.num_res_vars_ignored_from_general,
            )?;
        }
        write!(
            f,
            "Loops: {ld}, #Tmp: {nt}, Rej: {rej}, Conf: {conf}, \
             Ub+: {ub}, UbHits: {ubh}, Ud+: {ud}, UdHits: {udh}]",
            ld = s.loops_detected,
            nt = s.temp_sat_cache_adds,
            rej = s.temp_sat_cache_rejected,
            conf = s.temp_sat_cache_confirmed,
            ub = s.cached_unboxings,
            ubh = s.unbox_cache_hits,
            ud = s.cached_undiamondings,
            udh = s.undiamond_cache_hits,
        )
    }
}

/// The outcome of a `-classify` run.
pub struct ClassifyOutput {
    pub report: ClassifyReport,
}

impl std::fmt::Display for ClassifyOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.report.unsatisfiable_ontology {
            writeln!(f, "Ontology is unsatisfiable!")?;
            return write!(f, "No more tests performed.");
        }
        let mut lines = Vec::new();
        for name in &self.report.empty_classes {
            lines.push(format!("{name} is an empty class!"));
        }
        for (c, d) in &self.report.subsumptions {
            lines.push(format!("{c} [= {d}"));
        }
        write!(f, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provable_decision_renders_exactly() {
        let report = DecisionReport {
            logic: Logic::K,
            provable: true,
            stats: Stats::default(),
        };
        assert_eq!(
            report.to_string(),
            "K:Psi is Provable from Gamma [Not-psi and Gamma is Unsatisfiable]."
        );
    }

    #[test]
    fn not_provable_decision_renders_exactly() {
        let report = DecisionReport {
            logic: Logic::S4,
            provable: false,
            stats: Stats::default(),
        };
        assert_eq!(
            report.to_string(),
            "S4:Psi is Not provable from Gamma [Not-psi and Gamma is Satisfiable]."
        );
    }

    #[test]
    fn unsatisfiable_ontology_short_circuits_output() {
        let output = ClassifyOutput {
            report: ClassifyReport {
                unsatisfiable_ontology: true,
                empty_classes: Vec::new(),
                subsumptions: Vec::new(),
            },
        };
        assert_eq!(output.to_string(), "Ontology is unsatisfiable!\nNo more tests performed.");
    }

    #[test]
    fn verbose_stats_k_includes_ignored_counters() {
        let mut stats = Stats::default();
        stats.sat_cache_adds = 1;
        stats.num_vars = 10;
        stats.num_vars_reduced = 8;
        stats.num_res_vars_ignored_from_box = 2;
        stats.num_res_vars_ignored_from_dia = 1;
        stats.num_res_vars_ignored_from_general = 3;
        let rendered = VerboseStats { stats: &stats, k_only: true }.to_string();
        assert!(rendered.starts_with(" (1:0 / 0:0) [V: 10 - 8, D: 0/0, "));
        assert!(rendered.contains("Ig[]: 2, Ig<>: 1, IgGen: 3, "));
        assert!(rendered.ends_with("Ud+: 0, UdHits: 0]"));
    }

    #[test]
    fn verbose_stats_s4_omits_ignored_counters() {
        let stats = Stats::default();
        let rendered = VerboseStats { stats: &stats, k_only: false }.to_string();
        assert!(!rendered.contains("Ig[]"));
        assert!(rendered.contains("Loops: 0, #Tmp: 0"));
    }

    #[test]
    fn classify_lists_subsumptions_and_empties() {
        let output = ClassifyOutput {
            report: ClassifyReport {
                unsatisfiable_ontology: false,
                empty_classes: vec!["weird".to_string()],
                subsumptions: vec![("dog".to_string(), "mammal".to_string())],
            },
        };
        assert_eq!(output.to_string(), "weird is an empty class!\ndog [= mammal");
    }
}
