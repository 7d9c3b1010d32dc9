//! Logging setup.
//!
//! Everything logs through the `log` facade; `env_logger` is the only backend
//! and writes to stderr, which is where boot diagnostics are expected.

mod init;

pub use init::{init_logging, LoggingConfig};
