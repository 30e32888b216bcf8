pub mod logging;

// Re-export commonly used functions
pub use logging::{init_logging, init_test_logging, LOG_ENV_VAR};
