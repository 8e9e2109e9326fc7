//! Configuration and constants shared by the engine and the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Breakdown categories with special handling. Keys are stored lowercase.
pub const DOUBLECOUNTED: &str = "doublecounted";
pub const LIQUID_STAKING: &str = "liquidstaking";
pub const EXCLUDE_PARENT: &str = "excludeparent";
/// Value counted in both `doublecounted` and `liquidstaking`
pub const DC_AND_LS_OVERLAP: &str = "dcandlsoverlap";

/// Categories already included in raw feeds; toggling them never adds value
pub const PRE_INCLUDED_CATEGORIES: &[&str] = &[DOUBLECOUNTED, LIQUID_STAKING, DC_AND_LS_OVERLAP];

/// Category label that keeps its row but strikes its TVL unless liquid staking is toggled on
pub const LIQUID_STAKING_CATEGORY: &str = "Liquid Staking";

// Bridge attribution labels
pub const NATIVELY_ISSUED: &str = "Natively Issued";
pub const NOT_FOUND: &str = "not-found";
pub const NO_BRIDGE: &str = "-";

/// Months per year used to annualize trailing 30d fees/revenue
pub const ANNUALIZATION_FACTOR: f64 = 12.2;

/// Categories whose TVL is not counted towards chain TVL
pub const REMOVED_CATEGORIES_FROM_CHAIN_TVL: &[&str] = &[
    "Chain",
    "CEX",
    "Infrastructure",
    "Staking Pool",
    "RWA",
    "Basis Trading",
    "CeDeFi",
    "Bridge",
    "Canonical Bridge",
    "Farm",
    "Yield Aggregator",
    "Yield",
    "Liquidity manager",
    "Onchain Capital Allocator",
    "Risk Curators",
    "Treasury Manager",
    "Anchor BTC",
    "CDP Manager",
    "Restaked BTC",
    "RWA Lending",
];

/// Check whether a protocol category is excluded from chain TVL
pub fn is_removed_from_chain_tvl(category: &str) -> bool {
    REMOVED_CATEGORIES_FROM_CHAIN_TVL.contains(&category)
}
