//! Utility modules for configuration, error handling, and numeric helpers.

pub mod config;
pub mod error;
pub mod math;

// Re-export commonly used error types for convenience
pub use error::{ConfigError, InputError, OutputError};
