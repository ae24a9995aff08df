//! Shared utilities for the heritage platform.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
