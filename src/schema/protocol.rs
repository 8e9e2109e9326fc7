//! Protocol table rows and parent protocol specifications.

use super::snapshot::ExtraBreakdown;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the protocols table
///
/// Every numeric field is optional: `None` means "no data" and is omitted
/// from serialized output, which keeps it distinct from a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolRow {
    pub name: String,

    /// Id of the parent protocol this row belongs to, if any
    #[serde(rename = "parentProtocol", skip_serializing_if = "Option::is_none")]
    pub parent_protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chains: Vec<String>,

    // TVL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvl: Option<f64>,
    #[serde(rename = "tvlPrevDay", skip_serializing_if = "Option::is_none")]
    pub tvl_prev_day: Option<f64>,
    #[serde(rename = "tvlPrevWeek", skip_serializing_if = "Option::is_none")]
    pub tvl_prev_week: Option<f64>,
    #[serde(rename = "tvlPrevMonth", skip_serializing_if = "Option::is_none")]
    pub tvl_prev_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_1d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_7d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_1m: Option<f64>,
    #[serde(rename = "extraTvl", skip_serializing_if = "ExtraBreakdown::is_empty")]
    pub extra_tvl: ExtraBreakdown,

    // Token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcaptvl: Option<f64>,

    // Spot volume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_7d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_30d: Option<f64>,
    #[serde(rename = "volumeChange_1d", skip_serializing_if = "Option::is_none")]
    pub volume_change_1d: Option<f64>,
    #[serde(rename = "volumeChange_7d", skip_serializing_if = "Option::is_none")]
    pub volume_change_7d: Option<f64>,
    #[serde(rename = "volumeChange_1m", skip_serializing_if = "Option::is_none")]
    pub volume_change_1m: Option<f64>,
    #[serde(rename = "cumulativeVolume", skip_serializing_if = "Option::is_none")]
    pub cumulative_volume: Option<f64>,
    #[serde(rename = "volumeDominance_24h", skip_serializing_if = "Option::is_none")]
    pub volume_dominance_24h: Option<f64>,
    #[serde(rename = "volumeMarketShare7d", skip_serializing_if = "Option::is_none")]
    pub volume_market_share_7d: Option<f64>,

    // Perps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perps_volume_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perps_volume_7d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perps_volume_30d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perps_volume_change_7d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perps_volume_dominance_24h: Option<f64>,
    #[serde(rename = "openInterest", skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,

    // Fees and revenue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_7d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_30d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_1y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_7d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_30d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_1y: Option<f64>,
    #[serde(rename = "holderRevenue_24h", skip_serializing_if = "Option::is_none")]
    pub holder_revenue_24h: Option<f64>,
    #[serde(rename = "holdersRevenue30d", skip_serializing_if = "Option::is_none")]
    pub holders_revenue_30d: Option<f64>,
    #[serde(rename = "userFees_24h", skip_serializing_if = "Option::is_none")]
    pub user_fees_24h: Option<f64>,
    #[serde(rename = "treasuryRevenue_24h", skip_serializing_if = "Option::is_none")]
    pub treasury_revenue_24h: Option<f64>,
    #[serde(rename = "supplySideRevenue_24h", skip_serializing_if = "Option::is_none")]
    pub supply_side_revenue_24h: Option<f64>,
    #[serde(rename = "cumulativeFees", skip_serializing_if = "Option::is_none")]
    pub cumulative_fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pf: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<f64>,

    // Oracles
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oracles: Vec<String>,
    #[serde(rename = "oraclesByChain", skip_serializing_if = "BTreeMap::is_empty")]
    pub oracles_by_chain: BTreeMap<String, Vec<String>>,

    // Flags
    #[serde(rename = "strikeTvl")]
    pub strike_tvl: bool,
    #[serde(rename = "parentExcluded")]
    pub parent_excluded: bool,
    #[serde(rename = "isParentProtocol")]
    pub is_parent_protocol: bool,

    #[serde(rename = "subRows", skip_serializing_if = "Option::is_none")]
    pub sub_rows: Option<Vec<ProtocolRow>>,
}

impl ProtocolRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for the parent protocol id
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_protocol = Some(parent_id.into());
        self
    }
}

/// A parent protocol that child rows point to through `parentProtocol`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentSpec {
    pub id: String,
    pub name: String,

    /// Market cap declared on the parent itself (tokens priced only at the top level)
    pub mcap: Option<f64>,

    pub chains: Vec<String>,
    pub oracles: Vec<String>,
    #[serde(rename = "oraclesByChain")]
    pub oracles_by_chain: BTreeMap<String, Vec<String>>,
}

impl ParentSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_row_field_names() {
        let row: ProtocolRow = serde_json::from_str(
            r#"{
                "name": "Aave V3",
                "parentProtocol": "parent#aave",
                "tvl": 100,
                "tvlPrevDay": 80,
                "volume_7d": 10,
                "volumeChange_7d": 5,
                "extraTvl": {"doublecounted": {"tvl": 20}}
            }"#,
        )
        .unwrap();

        assert_eq!(row.parent_protocol.as_deref(), Some("parent#aave"));
        assert_eq!(row.tvl_prev_day, Some(80.0));
        assert_eq!(row.volume_change_7d, Some(5.0));
        assert!(row.extra_tvl.contains("doublecounted"));
        assert!(row.fees_30d.is_none());
    }

    #[test]
    fn test_missing_fields_are_not_serialized() {
        let json = serde_json::to_value(ProtocolRow::new("Solo")).unwrap();
        assert!(json.get("tvl").is_none());
        assert!(json.get("subRows").is_none());
        assert_eq!(json["strikeTvl"], false);
    }
}
