//! Pegged-asset (stablecoin) rows with bridge-source breakdowns.

use serde::{Deserialize, Serialize};

/// One slice of a circulating asset minted through a bridge from a source chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeSource {
    #[serde(rename = "bridgeId")]
    pub bridge_id: String,
    #[serde(rename = "sourceChain")]
    pub source_chain: String,
    pub amount: f64,
}

impl BridgeSource {
    pub fn new(bridge_id: impl Into<String>, source_chain: impl Into<String>, amount: f64) -> Self {
        Self {
            bridge_id: bridge_id.into(),
            source_chain: source_chain.into(),
            amount,
        }
    }
}

/// Display information for a bridge id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl BridgeInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: None,
        }
    }
}

/// A pegged asset's circulating supply on one chain, with its bridge sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeggedAssetWithBridges {
    pub name: String,
    pub symbol: Option<String>,
    pub circulating: f64,
    pub unreleased: Option<f64>,
    #[serde(rename = "bridgedAmount")]
    pub bridged_amount: Option<f64>,
    pub change_1d: Option<f64>,
    pub change_7d: Option<f64>,
    pub change_1m: Option<f64>,
    #[serde(rename = "circulatingPrevDay")]
    pub circulating_prev_day: Option<f64>,
    #[serde(rename = "circulatingPrevWeek")]
    pub circulating_prev_week: Option<f64>,
    #[serde(rename = "circulatingPrevMonth")]
    pub circulating_prev_month: Option<f64>,
    /// Bridge sources in upstream order; the first one decides the single-source label
    pub bridges: Vec<BridgeSource>,
}

/// Output row of bridge attribution
///
/// `bridged_share` is the display string (`"63.64%"`, `"100%"`) shown in the
/// bridged column; it is `None` when the share is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributedRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub circulating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreleased: Option<f64>,
    #[serde(rename = "bridgedAmount")]
    pub bridged_share: Option<String>,
    #[serde(rename = "bridgeInfo")]
    pub bridge_info: BridgeInfo,
    pub change_1d: Option<f64>,
    pub change_7d: Option<f64>,
    pub change_1m: Option<f64>,
    #[serde(rename = "circulatingPrevDay")]
    pub circulating_prev_day: Option<f64>,
    #[serde(rename = "circulatingPrevWeek")]
    pub circulating_prev_week: Option<f64>,
    #[serde(rename = "circulatingPrevMonth")]
    pub circulating_prev_month: Option<f64>,
    #[serde(rename = "subRows", default, skip_serializing_if = "Option::is_none")]
    pub sub_rows: Option<Vec<AttributedRow>>,
}

impl AttributedRow {
    /// Row carrying the asset's own figures, with the given share and bridge label
    pub fn from_asset(
        asset: &PeggedAssetWithBridges,
        bridged_share: Option<String>,
        bridge_info: BridgeInfo,
    ) -> Self {
        Self {
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
            circulating: asset.circulating,
            unreleased: asset.unreleased,
            bridged_share,
            bridge_info,
            change_1d: asset.change_1d,
            change_7d: asset.change_7d,
            change_1m: asset.change_1m,
            circulating_prev_day: asset.circulating_prev_day,
            circulating_prev_week: asset.circulating_prev_week,
            circulating_prev_month: asset.circulating_prev_month,
            sub_rows: None,
        }
    }
}
