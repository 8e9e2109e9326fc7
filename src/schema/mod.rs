//! Row and snapshot types consumed and produced by the engine.
//!
//! Field names are the stable contract with the dashboard: `tvl`,
//! `tvlPrevDay`, `mcap`, `volume_7d`, ... Everything here is plain data;
//! behaviour lives in `compose`, `grouping` and `attribution`.

pub mod entity;
pub mod pegged;
pub mod protocol;
pub mod report;
pub mod snapshot;
pub mod toggles;

// Re-export main types
pub use entity::Entity;
pub use pegged::{AttributedRow, BridgeInfo, BridgeSource, PeggedAssetWithBridges};
pub use protocol::{ParentSpec, ProtocolRow};
pub use report::Report;
pub use snapshot::{ExtraBreakdown, MetricSnapshot};
pub use toggles::ToggleSet;

/// Well-known metric field names
pub mod fields {
    pub const TVL: &str = "tvl";
    pub const TVL_PREV_DAY: &str = "tvlPrevDay";
    pub const TVL_PREV_WEEK: &str = "tvlPrevWeek";
    pub const TVL_PREV_MONTH: &str = "tvlPrevMonth";

    pub const MCAP: &str = "mcap";
    pub const MCAP_PREV_DAY: &str = "mcapPrevDay";
    pub const MCAP_PREV_WEEK: &str = "mcapPrevWeek";
    pub const MCAP_PREV_MONTH: &str = "mcapPrevMonth";

    pub const CIRCULATING: &str = "circulating";
    pub const UNRELEASED: &str = "unreleased";
    pub const BRIDGED_TO: &str = "bridgedTo";
    pub const MINTED: &str = "minted";

    pub const CHANGE_1D: &str = "change_1d";
    pub const CHANGE_7D: &str = "change_7d";
    pub const CHANGE_1M: &str = "change_1m";
    pub const MCAPTVL: &str = "mcaptvl";
    pub const DOMINANCE: &str = "dominance";

    /// Fields derived from other fields; never composed or summed directly
    pub const DERIVED: &[&str] = &[CHANGE_1D, CHANGE_7D, CHANGE_1M, MCAPTVL, DOMINANCE];

    pub fn is_derived(field: &str) -> bool {
        DERIVED.contains(&field)
    }
}
