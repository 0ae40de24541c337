//! Logger setup for binaries and tests built on `lumen-text`.
//!
//! The library itself only talks to the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
