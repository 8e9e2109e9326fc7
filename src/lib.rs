//! Metrics Aggregator
//!
//! Composition and grouping engine behind DeFi dashboard tables and charts.
//!
//! The engine folds user-toggled extra categories (staking, borrowed,
//! double-counted, ...) into base metrics, rolls child rows up into parent
//! rows, and attributes pegged-asset supply to bridge sources. Every
//! transform is a pure function over in-memory rows.
//!
//! ## Getting Started
//!
//! ```bash
//! metrics-aggregator protocols --input protocols.json --toggle staking --output table.json
//! metrics-aggregator --help
//! ```
//!
//! Library users start from [`compose::compose`], [`compose::format_protocols_list`],
//! [`grouping::group_entities`] and [`attribution::attribute_bridges`].

pub mod attribution;
pub mod commands;
pub mod compose;
pub mod grouping;
pub mod output;
pub mod schema;
pub mod utils;
