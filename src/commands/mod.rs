//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands load an input bundle, run one engine pipeline and write a report.

pub mod bridges;
pub mod chains;
pub mod models;
pub mod protocols;
pub mod series;

use crate::utils::config::SCHEMA_VERSION;

// Re-export main command functions
pub use bridges::execute_bridges;
pub use chains::execute_chains;
pub use models::{BridgesArgs, ChainsArgs, EntityKindArg, ProtocolsArgs, SeriesArgs};
pub use protocols::execute_protocols;
pub use series::execute_series;

/// Display version information
pub fn display_version() {
    println!("Metrics Aggregator v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Extra-metric composition and parent/child grouping for dashboard tables.");
}
