//! The `tableau` binary: reads one or two lines from standard input (spec.md
//! §6), decides or classifies them against a [tableau::context::Context]
//! built from the parsed CLI flags, and prints the `K:`/`S4:` report line
//! (and, under `-v`, the statistics line) before setting the process exit
//! code.
//!
//! Grounded in `otter_cli`'s `main.rs`: flags parsed once up front, the
//! actual decision run on a dedicated worker thread. Here that thread is
//! given a 32MB stack explicitly (`Builder::stack_size`), the idiomatic
//! replacement spec.md §9 asks for in place of the original's
//! `setrlimit(RLIMIT_STACK, ...)` call --- recursion depth in an adversarial
//! modal-jump search can exceed the default thread stack.

mod cli;
mod config;

use std::io::{self, BufRead};

use tableau::context::{Context, DecisionOutcome};
use tableau::reports::VerboseStats;
use tableau::types::err::ErrorKind;

const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let matches = match cli::cli().try_get_matches() {
        Ok(m) => m,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let config = config::config_from_args(&matches);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let line1 = lines.next().and_then(Result::ok).unwrap_or_default();
    let line2 = if config.classify {
        None
    } else if config.global_assumptions {
        Some(lines.next().and_then(Result::ok).unwrap_or_default())
    } else {
        None
    };

    let builder = std::thread::Builder::new()
        .name("tableau-decide".to_string())
        .stack_size(WORKER_STACK_SIZE);
    let handle = builder
        .spawn(move || run(config, line1, line2))
        .expect("failed to spawn decision worker thread");

    let exit_code = handle.join().unwrap_or_else(|_| {
        eprintln!("error: decision worker thread panicked");
        1
    });
    std::process::exit(exit_code);
}

fn run(config: tableau::config::Config, line1: String, line2: Option<String>) -> i32 {
    let classify = config.classify;
    let verbose = config.verbose;
    let ctx = Context::new(config);

    if classify {
        return run_classify(&ctx, &line1);
    }

    match ctx.decide(&line1, line2.as_deref()) {
        Ok(DecisionOutcome::EmptyFormula) => {
            println!("Empty formula is provable.");
            1
        }
        Ok(DecisionOutcome::Decided(report)) => {
            if verbose {
                let k_only = matches!(report.logic, tableau::reports::Logic::K);
                let stats = VerboseStats {
                    stats: &report.stats,
                    k_only,
                };
                println!("{report} {stats}");
            } else {
                println!("{report}");
            }
            0
        }
        Err(e) => report_error(&e),
    }
}

fn run_classify(ctx: &Context, gamma_line: &str) -> i32 {
    match ctx.classify(gamma_line) {
        Ok(output) => {
            println!("{output}");
            if output.report.unsatisfiable_ontology {
                1
            } else {
                0
            }
        }
        Err(e) => report_error(&e),
    }
}

fn report_error(e: &ErrorKind) -> i32 {
    eprintln!("error: {e}");
    1
}
