//! Logging utilities.
//!
//! This module centralizes logger initialization. Library code logs through
//! the `log` facade only; binaries pick the backend by calling
//! [`init_logging`] early in `main`.

mod init;

pub use init::{init_logging, LoggingConfig};
