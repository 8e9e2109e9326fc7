//! Parent/child grouping of table rows.
//!
//! Both groupers follow the same pattern: merge named children into a
//! parent, remember every merged child so it is never added twice, and drop
//! merged children from the flat output.
//! - `entity`: chains and pegged assets, driven by configured relations
//! - `protocol`: sub-protocols under a parent protocol

pub mod entity;
pub mod protocol;
pub mod relations;

// Re-export main types and functions
pub use entity::{group_entities, ChainKind, EntityKind, PeggedKind};
pub use protocol::{group_children, group_protocols};
pub use relations::{load_grouping_config, parse_grouping_config, GroupingConfig, GroupingRelation};
