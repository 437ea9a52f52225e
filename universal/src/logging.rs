//! Diagnostic output for the `universal-jar` binary.
//!
//! Library code only logs through `log` macros. The binary installs a
//! `tracing-subscriber` formatter on stderr, whose `tracing-log` bridge
//! forwards those records. `RUST_LOG` refines the level chosen by `-v`/`-q`.

use std::error::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Map CLI verbosity flags to a level filter.
///
/// `-q` wins over any number of `-v` flags and shows errors only.
#[must_use]
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the stderr subscriber with `level` as the default directive.
///
/// # Errors
///
/// Returns an error if a global subscriber or `log` logger is already set.
pub fn init(level: LevelFilter) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}
