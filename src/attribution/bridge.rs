//! Attribute a pegged asset's circulating supply to its bridge sources.

use crate::schema::{AttributedRow, BridgeInfo, PeggedAssetWithBridges};
use crate::utils::config::{NATIVELY_ISSUED, NOT_FOUND, NO_BRIDGE};
use crate::utils::math::{finite, round2};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Attribute every asset row and order the table
///
/// **Public** - main entry point for bridge attribution
///
/// # Arguments
/// * `assets` - Per-chain asset rows with their bridge sources
/// * `bridge_info` - Display info keyed by bridge id
///
/// # Returns
/// Attributed rows sorted by circulating supply (descending).
/// Rows without a name are dropped.
pub fn attribute_bridges(
    assets: &[PeggedAssetWithBridges],
    bridge_info: &HashMap<String, BridgeInfo>,
) -> Vec<AttributedRow> {
    info!("Attributing bridge sources for {} assets", assets.len());

    let mut rows: Vec<AttributedRow> = assets
        .iter()
        .filter(|asset| !asset.name.is_empty())
        .map(|asset| attribute_bridge_sources(asset, bridge_info))
        .collect();

    rows.sort_by(|a, b| b.circulating.total_cmp(&a.circulating));
    rows
}

/// Attribute one asset row to its bridge sources
///
/// **Public** - useful for refreshing a single row
///
/// A single bridge with a single source accounting for the whole supply
/// collapses to one labelled child. Otherwise each source becomes a child
/// row whose share is its fraction of the bridged total, scaled by the
/// asset's overall bridged percentage.
pub fn attribute_bridge_sources(
    asset: &PeggedAssetWithBridges,
    bridge_info: &HashMap<String, BridgeInfo>,
) -> AttributedRow {
    let percent_bridged = bridged_percent(asset);
    let share = percent_bridged.map(format_bridged_share);

    if asset.bridges.is_empty() {
        return AttributedRow::from_asset(asset, share, BridgeInfo::named(NO_BRIDGE));
    }

    if let [only] = asset.bridges.as_slice() {
        if asset.bridged_amount == Some(asset.circulating) {
            let info = lookup_bridge(bridge_info, &only.bridge_id, &asset.name);
            let (label, info) = if info.name == NATIVELY_ISSUED {
                (NATIVELY_ISSUED.to_string(), BridgeInfo::named(NO_BRIDGE))
            } else {
                (format!("Bridged from {}", capitalize(&only.source_chain)), info)
            };
            debug!("{}: single source ({})", asset.name, label);

            let child = AttributedRow {
                name: label,
                ..AttributedRow::from_asset(asset, share.clone(), info.clone())
            };
            return AttributedRow {
                sub_rows: Some(vec![child]),
                ..AttributedRow::from_asset(asset, share, info)
            };
        }
    }

    // Shares are renormalized against the summed source amounts, which can
    // drift from the reported bridged amount upstream
    let total_bridged: f64 = asset.bridges.iter().map(|b| b.amount).sum();
    let scale = percent_bridged.unwrap_or(0.0).min(100.0);

    let children: Vec<AttributedRow> = asset
        .bridges
        .iter()
        .map(|source| {
            let child_share = if source.amount != 0.0 && total_bridged != 0.0 {
                finite(source.amount / total_bridged * scale).unwrap_or(0.0)
            } else {
                0.0
            };

            AttributedRow {
                name: format!("Bridged from {}", capitalize(&source.source_chain)),
                circulating: source.amount,
                change_1d: None,
                change_7d: None,
                change_1m: None,
                ..AttributedRow::from_asset(
                    asset,
                    Some(format_bridged_share(child_share)),
                    lookup_bridge(bridge_info, &source.bridge_id, &asset.name),
                )
            }
        })
        .collect();

    debug!(
        "{}: {} bridge sources, {:.2} bridged",
        asset.name,
        children.len(),
        total_bridged
    );

    AttributedRow {
        sub_rows: Some(children),
        ..AttributedRow::from_asset(asset, share, BridgeInfo::named(NO_BRIDGE))
    }
}

/// Render a bridged percentage for display
///
/// Shares below 100 keep two decimals; anything at or above 100 reads `"100%"`.
pub fn format_bridged_share(percent: f64) -> String {
    if percent < 100.0 {
        format!("{:.2}%", round2(percent))
    } else {
        "100%".to_string()
    }
}

/// Bridged amount as a percentage of circulating supply
fn bridged_percent(asset: &PeggedAssetWithBridges) -> Option<f64> {
    match asset.bridged_amount {
        Some(bridged) if bridged != 0.0 && asset.circulating != 0.0 => {
            finite(bridged / asset.circulating * 100.0)
        }
        _ => None,
    }
}

fn lookup_bridge(bridge_info: &HashMap<String, BridgeInfo>, bridge_id: &str, asset: &str) -> BridgeInfo {
    bridge_info.get(bridge_id).cloned().unwrap_or_else(|| {
        warn!("{}: unknown bridge id {}", asset, bridge_id);
        BridgeInfo::named(NOT_FOUND)
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
