//! Logging setup for the CLI.
//!
//! stdout carries JSON envelopes only, so every log line goes to stderr.
//! The filter is read from `DOCQUERY_LOG`, then `RUST_LOG`, then falls back to the default
//! level.

use tracing_subscriber::EnvFilter;

/// Environment variable checked first for a log filter
pub const LOG_ENV: &str = "DOCQUERY_LOG";

/// Build the filter used by [`init`]
#[must_use]
pub fn filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "warn" };
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the stderr subscriber
///
/// Calling it twice is harmless: the second install is ignored.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
