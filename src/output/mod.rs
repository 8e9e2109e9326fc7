//! Reading input bundles and writing reports.
//!
//! All file I/O of the crate lives here; the engine itself only sees
//! in-memory rows.

pub mod json;

// Re-export main functions
pub use json::{read_json, report_to_string, write_report};
