//! Logging configuration.
//!
//! Report tables own stdout, so all log output goes to stderr.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Initializes logging to stderr, filtered by `RUST_LOG`.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds the filter from `RUST_LOG`, falling back to warnings only.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
