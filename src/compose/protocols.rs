//! Format the protocols table: compose extra TVL, flag struck rows,
//! compute market shares, then group children under their parents.

use super::extra::compose;
use crate::grouping::group_protocols;
use crate::schema::fields;
use crate::schema::{MetricSnapshot, ParentSpec, ProtocolRow, ToggleSet};
use crate::utils::config::{
    is_removed_from_chain_tvl, DOUBLECOUNTED, LIQUID_STAKING, LIQUID_STAKING_CATEGORY,
};
use crate::utils::math::{mcap_tvl_ratio, percent_change};
use log::{debug, info};

/// Build the final protocols table
///
/// **Public** - main entry point for protocol rows
///
/// # Arguments
/// * `protocols` - Raw protocol rows with their `extraTvl` breakdowns
/// * `parents` - Parent protocols children may be grouped under
/// * `toggles` - Extra TVL categories the user opted into
/// * `no_subrows` - Keep grouped children flat and add parents as summary rows
///
/// # Returns
/// Rows sorted by TVL (descending)
pub fn format_protocols_list(
    protocols: &[ProtocolRow],
    parents: &[ParentSpec],
    toggles: &ToggleSet,
    no_subrows: bool,
) -> Vec<ProtocolRow> {
    info!(
        "Formatting {} protocols ({} parents, toggles: [{}])",
        protocols.len(),
        parents.len(),
        toggles.enabled().collect::<Vec<_>>().join(", ")
    );

    let mut rows: Vec<ProtocolRow> = protocols
        .iter()
        .filter(|protocol| !protocol.name.is_empty())
        .map(|protocol| compose_protocol(protocol, toggles))
        .collect();

    apply_market_shares(&mut rows);

    group_protocols(&rows, parents, no_subrows)
}

/// Compose one protocol's TVL fields and re-derive its ratios
///
/// **Public** - useful when a single row must be refreshed
pub fn compose_protocol(protocol: &ProtocolRow, toggles: &ToggleSet) -> ProtocolRow {
    let mut base = MetricSnapshot::new();
    base.set(fields::TVL, protocol.tvl);
    base.set(fields::TVL_PREV_DAY, protocol.tvl_prev_day);
    base.set(fields::TVL_PREV_WEEK, protocol.tvl_prev_week);
    base.set(fields::TVL_PREV_MONTH, protocol.tvl_prev_month);

    let composed = compose(
        &base,
        &protocol.extra_tvl,
        toggles,
        toggles.subtracts_doublecounted(),
    );

    let tvl = composed.get(fields::TVL);
    let tvl_prev_day = composed.get(fields::TVL_PREV_DAY);
    let tvl_prev_week = composed.get(fields::TVL_PREV_WEEK);
    let tvl_prev_month = composed.get(fields::TVL_PREV_MONTH);

    ProtocolRow {
        tvl,
        tvl_prev_day,
        tvl_prev_week,
        tvl_prev_month,
        change_1d: percent_change(tvl, tvl_prev_day),
        change_7d: percent_change(tvl, tvl_prev_week),
        change_1m: percent_change(tvl, tvl_prev_month),
        mcaptvl: mcap_tvl_ratio(protocol.mcap, tvl),
        strike_tvl: is_struck(protocol, toggles),
        ..protocol.clone()
    }
}

/// Rows stay in the table but their TVL is struck through
///
/// Liquid staking rows are struck until liquid staking is toggled on, rows in
/// a category removed from chain TVL always are, and rows carrying
/// double-counted value are struck while `doublecounted` is off. A liquid
/// staking row's double-counted value no longer strikes it once liquid
/// staking is on.
fn is_struck(protocol: &ProtocolRow, toggles: &ToggleSet) -> bool {
    let category = protocol.category.as_deref();
    let liquid_staking_on = toggles.is_enabled(LIQUID_STAKING);

    let struck_category = match category {
        Some(LIQUID_STAKING_CATEGORY) => !liquid_staking_on,
        Some(category) => is_removed_from_chain_tvl(category),
        None => false,
    };

    let struck_doublecounted = protocol.extra_tvl.contains(DOUBLECOUNTED)
        && !toggles.is_enabled(DOUBLECOUNTED)
        && (category != Some(LIQUID_STAKING_CATEGORY) || !liquid_staking_on);

    struck_category || struck_doublecounted
}

/// Fill volume dominance and market share columns from list-wide totals
fn apply_market_shares(rows: &mut [ProtocolRow]) {
    let total = |get: fn(&ProtocolRow) -> Option<f64>| -> f64 {
        rows.iter().filter_map(get).sum()
    };
    let spot_24h = total(|r| r.volume_24h);
    let spot_7d = total(|r| r.volume_7d);
    let perps_24h = total(|r| r.perps_volume_24h);

    debug!(
        "Market totals: spot 24h {:.0}, spot 7d {:.0}, perps 24h {:.0}",
        spot_24h, spot_7d, perps_24h
    );

    for row in rows.iter_mut() {
        row.volume_dominance_24h = share(row.volume_24h, spot_24h).or(row.volume_dominance_24h);
        row.volume_market_share_7d = share(row.volume_7d, spot_7d).or(row.volume_market_share_7d);
        row.perps_volume_dominance_24h =
            share(row.perps_volume_24h, perps_24h).or(row.perps_volume_dominance_24h);
    }
}

fn share(value: Option<f64>, total: f64) -> Option<f64> {
    match value {
        Some(v) if v != 0.0 && total > 0.0 => Some(v / total * 100.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ExtraBreakdown;

    fn protocol(name: &str, tvl: f64) -> ProtocolRow {
        ProtocolRow {
            tvl: Some(tvl),
            ..ProtocolRow::new(name)
        }
    }

    #[test]
    fn test_compose_protocol_subtracts_doublecounted_by_default() {
        let row = ProtocolRow {
            tvl_prev_day: Some(800.0),
            mcap: Some(400.0),
            extra_tvl: ExtraBreakdown::new().with(
                "doublecounted",
                MetricSnapshot::from([("tvl", 200.0), ("tvlPrevDay", 100.0)]),
            ),
            ..protocol("Lido", 1000.0)
        };

        let composed = compose_protocol(&row, &ToggleSet::new());
        assert_eq!(composed.tvl, Some(800.0));
        assert_eq!(composed.tvl_prev_day, Some(700.0));
        assert_eq!(composed.mcaptvl, Some(0.5));

        let restored = compose_protocol(&row, &ToggleSet::from_enabled(["doublecounted"]));
        assert_eq!(restored.tvl, Some(1000.0));
    }

    #[test]
    fn test_liquid_staking_struck_until_enabled() {
        let row = ProtocolRow {
            category: Some("Liquid Staking".to_string()),
            ..protocol("Lido", 10.0)
        };
        assert!(compose_protocol(&row, &ToggleSet::new()).strike_tvl);
        assert!(!compose_protocol(&row, &ToggleSet::from_enabled(["liquidstaking"])).strike_tvl);
    }

    #[test]
    fn test_removed_category_struck() {
        let row = ProtocolRow {
            category: Some("CEX".to_string()),
            ..protocol("Binance CEX", 10.0)
        };
        assert!(compose_protocol(&row, &ToggleSet::new()).strike_tvl);
    }

    #[test]
    fn test_market_shares() {
        let mut rows = vec![
            ProtocolRow {
                volume_24h: Some(30.0),
                ..protocol("A", 1.0)
            },
            ProtocolRow {
                volume_24h: Some(10.0),
                ..protocol("B", 1.0)
            },
            protocol("C", 1.0),
        ];
        apply_market_shares(&mut rows);

        assert_eq!(rows[0].volume_dominance_24h, Some(75.0));
        assert_eq!(rows[1].volume_dominance_24h, Some(25.0));
        assert_eq!(rows[2].volume_dominance_24h, None);
    }

    #[test]
    fn test_liquid_staking_toggle_only_strikes() {
        let row = ProtocolRow {
            category: Some("Liquid Staking".to_string()),
            extra_tvl: ExtraBreakdown::new()
                .with("liquidstaking", MetricSnapshot::from([("tvl", 1000.0)])),
            ..protocol("Lido", 1000.0)
        };

        let off = compose_protocol(&row, &ToggleSet::new());
        let on = compose_protocol(&row, &ToggleSet::from_enabled(["liquidstaking"]));

        assert_eq!((off.tvl, off.strike_tvl), (Some(1000.0), true));
        assert_eq!((on.tvl, on.strike_tvl), (Some(1000.0), false));
    }

    #[test]
    fn test_doublecounted_row_struck_until_enabled() {
        let row = ProtocolRow {
            category: Some("Dexes".to_string()),
            extra_tvl: ExtraBreakdown::new()
                .with("doublecounted", MetricSnapshot::from([("tvl", 500.0)])),
            ..protocol("DexAgg", 500.0)
        };

        let hidden = compose_protocol(&row, &ToggleSet::new());
        assert_eq!(hidden.tvl, Some(0.0));
        assert!(hidden.strike_tvl);

        let shown = compose_protocol(&row, &ToggleSet::from_enabled(["doublecounted"]));
        assert_eq!(shown.tvl, Some(500.0));
        assert!(!shown.strike_tvl);
    }

    #[test]
    fn test_liquid_staking_doublecounted_cleared_by_liquid_staking_toggle() {
        let row = ProtocolRow {
            category: Some("Liquid Staking".to_string()),
            extra_tvl: ExtraBreakdown::new()
                .with("doublecounted", MetricSnapshot::from([("tvl", 10.0)])),
            ..protocol("Rocket Pool", 100.0)
        };

        let toggles = ToggleSet::from_enabled(["liquidstaking"]);
        assert!(!compose_protocol(&row, &toggles).strike_tvl);
    }

    #[test]
    fn test_unnamed_rows_skipped() {
        let rows = format_protocols_list(
            &[protocol("", 10.0), protocol("Uniswap", 5.0)],
            &[],
            &ToggleSet::new(),
            false,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Uniswap");
    }
}
