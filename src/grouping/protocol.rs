//! Group sibling protocols under their parent protocol.
//!
//! A parent row is synthesized only when at least two rows point at it.
//! Absolute metrics are summed, percent-change metrics are volume-weighted,
//! and ratios are re-derived from the parent's own totals.

use crate::schema::{ParentSpec, ProtocolRow};
use crate::utils::config::EXCLUDE_PARENT;
use crate::utils::math::{add_observed, annualized_ratio, finite, mcap_tvl_ratio, percent_change};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Group protocols under their parents
///
/// **Public** - main entry point for protocol grouping
///
/// # Arguments
/// * `protocols` - Formatted protocol rows
/// * `parents` - Parent protocol specs, matched on `ProtocolRow::parent_protocol`
/// * `no_subrows` - Keep children flat and add the parent as an extra summary row
///
/// # Returns
/// Rows sorted by TVL (descending, missing TVL ranked as zero)
pub fn group_protocols(
    protocols: &[ProtocolRow],
    parents: &[ParentSpec],
    no_subrows: bool,
) -> Vec<ProtocolRow> {
    let mut data = protocols.to_vec();
    let mut seen_parents = HashSet::new();

    for parent in parents {
        if !seen_parents.insert(parent.id.as_str()) {
            continue;
        }

        let is_child = |p: &ProtocolRow| p.parent_protocol.as_deref() == Some(parent.id.as_str());
        let children: Vec<ProtocolRow> = protocols.iter().filter(|p| is_child(*p)).cloned().collect();

        if children.len() < 2 {
            debug!("Not grouping {}: {} child rows", parent.name, children.len());
            continue;
        }

        if !no_subrows {
            data.retain(|p| !is_child(p));
        }
        data.push(group_children(&children, parent, no_subrows));
    }

    data.sort_by(|a, b| b.tvl.unwrap_or(0.0).total_cmp(&a.tvl.unwrap_or(0.0)));
    data
}

/// Synthesize one parent row from its children
///
/// **Public** - useful when the child set is already known
pub fn group_children(children: &[ProtocolRow], parent: &ParentSpec, no_subrows: bool) -> ProtocolRow {
    let mut acc = children
        .iter()
        .fold(GroupAccumulator::default(), GroupAccumulator::absorb);

    // Exclusions apply to the summed totals, not to individual children
    for child in children {
        if let Some(excluded) = child.extra_tvl.get(EXCLUDE_PARENT) {
            let subtract = |field: &str| excluded.get(field).filter(|v| *v != 0.0).map(|v| -v);
            acc.tvl = add_observed(acc.tvl, subtract("tvl"));
            acc.tvl_prev_day = add_observed(acc.tvl_prev_day, subtract("tvlPrevDay"));
            acc.tvl_prev_week = add_observed(acc.tvl_prev_week, subtract("tvlPrevWeek"));
            acc.tvl_prev_month = add_observed(acc.tvl_prev_month, subtract("tvlPrevMonth"));
        }
    }

    let final_mcap = if acc.mcap > 0.0 { Some(acc.mcap) } else { parent.mcap };
    let nonzero_mcap = final_mcap.filter(|m| *m != 0.0);

    let mut oracles = acc.oracles;
    oracles.extend(parent.oracles.iter().cloned());
    let mut oracles_by_chain = acc.oracles_by_chain;
    for (chain, list) in &parent.oracles_by_chain {
        oracles_by_chain
            .entry(chain.clone())
            .or_default()
            .extend(list.iter().cloned());
    }

    let category = match acc.categories.len() {
        1 => acc.categories.into_iter().next(),
        _ => None,
    };

    debug!(
        "Grouped {} children under {} (tvl {:?})",
        children.len(),
        parent.name,
        acc.tvl
    );

    ProtocolRow {
        name: parent.name.clone(),
        chains: parent.chains.clone(),
        category,

        tvl: acc.tvl,
        tvl_prev_day: acc.tvl_prev_day,
        tvl_prev_week: acc.tvl_prev_week,
        tvl_prev_month: acc.tvl_prev_month,
        change_1d: percent_change(acc.tvl, acc.tvl_prev_day),
        change_7d: percent_change(acc.tvl, acc.tvl_prev_week),
        change_1m: percent_change(acc.tvl, acc.tvl_prev_month),

        mcap: final_mcap,
        mcaptvl: mcap_tvl_ratio(nonzero_mcap, acc.tvl),
        pf: annualized_ratio(final_mcap, acc.fees_30d),
        ps: annualized_ratio(final_mcap, acc.revenue_30d),

        volume_24h: acc.volume_24h,
        volume_7d: acc.volume_7d,
        volume_30d: acc.volume_30d,
        volume_change_7d: acc.volume_change.average(),
        cumulative_volume: acc.cumulative_volume,

        perps_volume_24h: acc.perps_volume_24h,
        perps_volume_7d: acc.perps_volume_7d,
        perps_volume_30d: acc.perps_volume_30d,
        perps_volume_change_7d: acc.perps_volume_change.average(),
        open_interest: acc.open_interest,

        fees_24h: acc.fees_24h,
        fees_7d: acc.fees_7d,
        fees_30d: acc.fees_30d,
        fees_1y: acc.fees_1y,
        revenue_24h: acc.revenue_24h,
        revenue_7d: acc.revenue_7d,
        revenue_30d: acc.revenue_30d,
        revenue_1y: acc.revenue_1y,
        holder_revenue_24h: acc.holder_revenue_24h,
        holders_revenue_30d: acc.holders_revenue_30d,
        user_fees_24h: acc.user_fees_24h,
        treasury_revenue_24h: acc.treasury_revenue_24h,
        supply_side_revenue_24h: acc.supply_side_revenue_24h,
        cumulative_fees: acc.cumulative_fees,

        oracles: oracles.into_iter().collect(),
        oracles_by_chain: oracles_by_chain
            .into_iter()
            .map(|(chain, set)| (chain, set.into_iter().collect()))
            .collect(),

        strike_tvl: acc.strike_tvl,
        parent_excluded: acc.parent_excluded,
        is_parent_protocol: true,
        sub_rows: (!no_subrows).then(|| children.to_vec()),
        ..ProtocolRow::default()
    }
}

/// Volume-weighted running average of a percent-change metric
#[derive(Debug, Default, Clone, Copy)]
struct WeightedChange {
    weighted_sum: f64,
    total_weight: f64,
}

impl WeightedChange {
    /// Only children reporting both a non-zero volume and a change count
    fn observe(self, change: Option<f64>, volume: Option<f64>) -> Self {
        match (change, volume) {
            (Some(change), Some(volume)) if volume != 0.0 => Self {
                weighted_sum: self.weighted_sum + change * volume,
                total_weight: self.total_weight + volume,
            },
            _ => self,
        }
    }

    fn average(&self) -> Option<f64> {
        if self.total_weight > 0.0 {
            finite(self.weighted_sum / self.total_weight)
        } else {
            None
        }
    }
}

/// Running totals while folding children into a parent
///
/// Additive fields stay `None` until a child reports a value, so a metric
/// nobody reports is absent on the parent rather than zero.
#[derive(Debug, Default)]
struct GroupAccumulator {
    tvl: Option<f64>,
    tvl_prev_day: Option<f64>,
    tvl_prev_week: Option<f64>,
    tvl_prev_month: Option<f64>,

    volume_24h: Option<f64>,
    volume_7d: Option<f64>,
    volume_30d: Option<f64>,
    cumulative_volume: Option<f64>,
    perps_volume_24h: Option<f64>,
    perps_volume_7d: Option<f64>,
    perps_volume_30d: Option<f64>,
    open_interest: Option<f64>,

    fees_24h: Option<f64>,
    fees_7d: Option<f64>,
    fees_30d: Option<f64>,
    fees_1y: Option<f64>,
    revenue_24h: Option<f64>,
    revenue_7d: Option<f64>,
    revenue_30d: Option<f64>,
    revenue_1y: Option<f64>,
    holder_revenue_24h: Option<f64>,
    holders_revenue_30d: Option<f64>,
    user_fees_24h: Option<f64>,
    treasury_revenue_24h: Option<f64>,
    supply_side_revenue_24h: Option<f64>,
    cumulative_fees: Option<f64>,

    mcap: f64,
    volume_change: WeightedChange,
    perps_volume_change: WeightedChange,

    categories: BTreeSet<String>,
    oracles: BTreeSet<String>,
    oracles_by_chain: BTreeMap<String, BTreeSet<String>>,
    strike_tvl: bool,
    parent_excluded: bool,
}

impl GroupAccumulator {
    fn absorb(mut self, row: &ProtocolRow) -> Self {
        self.tvl = add_observed(self.tvl, row.tvl);
        self.tvl_prev_day = add_observed(self.tvl_prev_day, row.tvl_prev_day);
        self.tvl_prev_week = add_observed(self.tvl_prev_week, row.tvl_prev_week);
        self.tvl_prev_month = add_observed(self.tvl_prev_month, row.tvl_prev_month);

        self.volume_24h = add_observed(self.volume_24h, row.volume_24h);
        self.volume_7d = add_observed(self.volume_7d, row.volume_7d);
        self.volume_30d = add_observed(self.volume_30d, row.volume_30d);
        self.cumulative_volume = add_observed(self.cumulative_volume, row.cumulative_volume);
        self.perps_volume_24h = add_observed(self.perps_volume_24h, row.perps_volume_24h);
        self.perps_volume_7d = add_observed(self.perps_volume_7d, row.perps_volume_7d);
        self.perps_volume_30d = add_observed(self.perps_volume_30d, row.perps_volume_30d);
        self.open_interest = add_observed(self.open_interest, row.open_interest);

        self.fees_24h = add_observed(self.fees_24h, row.fees_24h);
        self.fees_7d = add_observed(self.fees_7d, row.fees_7d);
        self.fees_30d = add_observed(self.fees_30d, row.fees_30d);
        self.fees_1y = add_observed(self.fees_1y, row.fees_1y);
        self.revenue_24h = add_observed(self.revenue_24h, row.revenue_24h);
        self.revenue_7d = add_observed(self.revenue_7d, row.revenue_7d);
        self.revenue_30d = add_observed(self.revenue_30d, row.revenue_30d);
        self.revenue_1y = add_observed(self.revenue_1y, row.revenue_1y);
        self.holder_revenue_24h = add_observed(self.holder_revenue_24h, row.holder_revenue_24h);
        self.holders_revenue_30d = add_observed(self.holders_revenue_30d, row.holders_revenue_30d);
        self.user_fees_24h = add_observed(self.user_fees_24h, row.user_fees_24h);
        self.treasury_revenue_24h = add_observed(self.treasury_revenue_24h, row.treasury_revenue_24h);
        self.supply_side_revenue_24h =
            add_observed(self.supply_side_revenue_24h, row.supply_side_revenue_24h);
        self.cumulative_fees = add_observed(self.cumulative_fees, row.cumulative_fees);

        self.mcap += row.mcap.unwrap_or(0.0);
        self.volume_change = self.volume_change.observe(row.volume_change_7d, row.volume_7d);
        self.perps_volume_change = self
            .perps_volume_change
            .observe(row.perps_volume_change_7d, row.perps_volume_7d);

        if let Some(category) = row.category.as_ref().filter(|c| !c.is_empty()) {
            self.categories.insert(category.clone());
        }
        self.oracles.extend(row.oracles.iter().cloned());
        for (chain, list) in &row.oracles_by_chain {
            self.oracles_by_chain
                .entry(chain.clone())
                .or_default()
                .extend(list.iter().cloned());
        }

        self.strike_tvl |= row.strike_tvl;
        self.parent_excluded |= row.parent_excluded || row.extra_tvl.contains(EXCLUDE_PARENT);
        self
    }
}
