//! Bridge attribution for pegged assets.
//!
//! Splits a chain's circulating supply into per-bridge slices and labels
//! where each slice was bridged from.

pub mod bridge;

pub use bridge::{attribute_bridge_sources, attribute_bridges, format_bridged_share};
