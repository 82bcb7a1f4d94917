//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! - `error`: precondition failures
//! - `warn`: per-file modification failures
//! - `info`: modified files and batch summaries
//! - `debug`: launch details and every applied assignment
//!
//! `RUST_LOG` takes precedence over the command-line verbosity.

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map `-q` / `-v` counts to a level: quiet is `error`, default `info`, `-v` `debug`,
/// `-vv` and above `trace`.
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber, writing to stderr so stdout stays clean for output.
pub fn init_logging(level: LevelFilter) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
