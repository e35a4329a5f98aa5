//! # Codeview Utilities
//!
//! Shared utilities for the Codeview workspace, chiefly logging setup built
//! on `tracing`.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};
