//! The `tableau` command line, grounded in `otter_cli`'s `parse::cli` module:
//! one `clap::Command` built by hand with the builder API, one `Arg` per
//! flag, long-prefix matching enabled so an unambiguous abbreviation of a
//! flag works exactly as spec.md §6 requires of the original's argv parser.
//!
//! spec.md's grammar calls for single-dash multi-letter flags (`-s4`,
//! `-buc`, ...), a shape clap's long options don't support (a clap long
//! option is always `--name`). Double-dash long options with
//! `infer_long_args` are the closest idiomatic clap equivalent --- same
//! prefix-matching behavior, one extra dash --- and are what's used here;
//! see DESIGN.md.

use clap::{value_parser, Arg, ArgAction, Command};

pub fn cli() -> Command {
    Command::new("tableau")
        .about("Decides satisfiability of propositional modal-logic formulas in K and S4.")
        .version(env!("CARGO_PKG_VERSION"))
        .infer_long_args(true)
        .arg(
            Arg::new("global")
                .long("g")
                .action(ArgAction::SetTrue)
                .help("Read a second input line as global assumptions (Gamma)."),
        )
        .arg(
            Arg::new("verbose")
                .long("v")
                .action(ArgAction::SetTrue)
                .help("Print the verbose statistics line after the decision."),
        )
        .arg(
            Arg::new("s4")
                .long("s4")
                .action(ArgAction::SetTrue)
                .help("Decide in S4 (reflexive-transitive) rather than K."),
        )
        .arg(
            Arg::new("buc")
                .long("buc")
                .action(ArgAction::SetTrue)
                .help("Use a single conjoined BDD for the unsat cache."),
        )
        .arg(
            Arg::new("nuc")
                .long("nuc")
                .action(ArgAction::SetTrue)
                .help("Disable the unsat cache entirely."),
        )
        .arg(
            Arg::new("suc")
                .long("suc")
                .action(ArgAction::SetTrue)
                .help("Use the saturation-unsat cache (keyed by post-modal-jump BDD)."),
        )
        .arg(
            Arg::new("rtol")
                .long("rtol")
                .action(ArgAction::SetTrue)
                .help("Pick the right-to-left (last) satisfying path at each saturation step."),
        )
        .arg(
            Arg::new("reorder")
                .long("reorder")
                .action(ArgAction::SetTrue)
                .help("Enable dynamic BDD variable reordering (accepted, no-op; see DESIGN.md)."),
        )
        .arg(
            Arg::new("onlygamma")
                .long("onlygamma")
                .action(ArgAction::SetTrue)
                .help("Restrict reordering to Gamma-construction (accepted, no-op; see DESIGN.md)."),
        )
        .arg(
            Arg::new("norm")
                .long("norm")
                .action(ArgAction::SetTrue)
                .help("Coalesce registered box variables that unbox to the same BDD."),
        )
        .arg(
            Arg::new("classify")
                .long("classify")
                .action(ArgAction::SetTrue)
                .help("Classify an ontology (Gamma alone) instead of deciding one formula."),
        )
        .arg(
            Arg::new("max_cache_size")
                .long("max-cache-size")
                .value_parser(value_parser!(usize))
                .num_args(1)
                .help("FIFO bound shared by the sat/conditional-sat/unsat/saturation-unsat caches."),
        )
}
