//! Output envelope written by every CLI command.

use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Versioned, timestamped wrapper around a command's output rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<T> {
    /// Schema version of the envelope
    pub version: String,

    /// ISO 8601 generation timestamp
    pub generated_at: String,

    pub rows: T,
}

impl<T> Report<T> {
    /// Wrap rows with the current schema version and timestamp
    pub fn new(rows: T) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            rows,
        }
    }
}
