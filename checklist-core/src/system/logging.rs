//! Tracing subscriber setup shared by binaries and tests

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CHECKLIST_LOG=checklist_basgroup=debug`
pub const LOG_ENV_VAR: &str = "CHECKLIST_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `CHECKLIST_LOG`, then `RUST_LOG`, then the given fallback
fn env_filter(fallback: &str) -> EnvFilter {
    match std::env::var(LOG_ENV_VAR) {
        Ok(filter) => EnvFilter::new(filter),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    }
}

/// Install the global fmt subscriber. Calling it twice is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_thread_names(true)
        .try_init();
}

/// Subscriber writing through the libtest capture, call once per test module
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}
