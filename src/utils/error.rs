//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The composition and grouping engine itself never fails: numeric problems
//! degrade to `None`. Only the I/O edges below can error.

use thiserror::Error;

/// Errors that can occur while reading input bundles
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read input file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid input JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors that can occur while loading grouping configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid grouping config: {0}")]
    ParseFailed(#[from] toml::de::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
