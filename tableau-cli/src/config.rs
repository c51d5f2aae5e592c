//! Maps parsed CLI flags onto a [tableau::config::Config], mirroring
//! `otter_cli`'s `parse::config::config_from_args`.

use clap::ArgMatches;
use tableau::caches::UnsatCacheKind;
use tableau::config::Config;

/// Builds a [Config] from `matches`, starting from [Config::default] and
/// overriding only the fields a flag was actually given for.
///
/// `-nuc`/`-buc`/`-suc` select mutually exclusive unsat-cache flavors
/// (spec.md §3 "only one flavor is intended active at a time"); when more
/// than one is given, the first in `-nuc`, `-buc`, `-suc` precedence wins,
/// matching the observable behavior of an `if`/`else if` chain over the
/// equivalent source flags (see DESIGN.md).
pub fn config_from_args(matches: &ArgMatches) -> Config {
    let mut config = Config::default();

    config.global_assumptions = matches.get_flag("global");
    config.verbose = matches.get_flag("verbose");
    config.s4 = matches.get_flag("s4");
    config.right_to_left = matches.get_flag("rtol");
    config.reorder = matches.get_flag("reorder");
    config.only_gamma = matches.get_flag("onlygamma");
    config.normalize = matches.get_flag("norm");
    config.classify = matches.get_flag("classify");

    config.unsat_cache_kind = if matches.get_flag("nuc") {
        UnsatCacheKind::None
    } else if matches.get_flag("buc") {
        UnsatCacheKind::SingleBdd
    } else if matches.get_flag("suc") {
        UnsatCacheKind::Saturation
    } else {
        UnsatCacheKind::Default
    };

    if let Some(&size) = matches.get_one::<usize>("max_cache_size") {
        config.max_cache_size = size;
    }

    config
}
