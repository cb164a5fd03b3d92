//! Process-wide logging setup, shared by `agent-cli` and any future entry point.
//!
//! A bare `env_logger` setup, generalized just enough to let the CLI's
//! `--verbose` flag raise the default level without the caller having to
//! touch `RUST_LOG` itself.

use log::LevelFilter;

/// Initializes the global logger. `RUST_LOG`, if set, always wins; otherwise
/// `default_level` is used. Safe to call more than once per process (subsequent
/// calls are no-ops).
pub fn init(default_level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    }
    let _ = builder.try_init();
}

/// Convenience wrapper for `agent-cli`'s `--verbose` flag.
pub fn init_for_cli(verbose: bool) {
    init(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
}
