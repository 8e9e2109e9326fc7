//! Composition of base metrics with toggle-selected extra categories.
//!
//! This module turns raw snapshots into display values:
//! - Single snapshots (`extra::compose`)
//! - Date-indexed series with daily totals (`series::compose_series`)
//! - Whole protocol tables (`protocols::format_protocols_list`)
//!
//! Derived fields (percent changes, `mcaptvl`) are never composed; they are
//! re-derived from the composed absolute values by [`refresh_derived`].

pub mod extra;
pub mod protocols;
pub mod series;

use crate::schema::fields;
use crate::schema::MetricSnapshot;
use crate::utils::math::{mcap_tvl_ratio, percent_change};

// Re-export main functions
pub use extra::{compose, compose_chart_field, compose_field};
pub use protocols::format_protocols_list;
pub use series::{compose_series, SeriesComposition, SeriesPoint, SnapshotWithBreakdown};

/// Which absolute field and history fields percent changes are derived from
#[derive(Debug, Clone, Copy)]
pub struct ChangeBasis {
    pub value: &'static str,
    pub prev_day: &'static str,
    pub prev_week: &'static str,
    pub prev_month: &'static str,
}

pub const TVL_CHANGES: ChangeBasis = ChangeBasis {
    value: fields::TVL,
    prev_day: fields::TVL_PREV_DAY,
    prev_week: fields::TVL_PREV_WEEK,
    prev_month: fields::TVL_PREV_MONTH,
};

pub const MCAP_CHANGES: ChangeBasis = ChangeBasis {
    value: fields::MCAP,
    prev_day: fields::MCAP_PREV_DAY,
    prev_week: fields::MCAP_PREV_WEEK,
    prev_month: fields::MCAP_PREV_MONTH,
};

/// Re-derive percent changes and `mcaptvl` from absolute values
///
/// **Public** - called after every composition or merge
///
/// A derived field is written only when its inputs are present in the
/// snapshot, or when a stale value for it is present (it is then reset so
/// it cannot outlive the values it was derived from).
pub fn refresh_derived(metrics: &mut MetricSnapshot, basis: &ChangeBasis) {
    let windows = [
        (fields::CHANGE_1D, basis.prev_day),
        (fields::CHANGE_7D, basis.prev_week),
        (fields::CHANGE_1M, basis.prev_month),
    ];

    for (change_field, prev_field) in windows {
        if metrics.contains(basis.value) && metrics.contains(prev_field) {
            let change = percent_change(metrics.get(basis.value), metrics.get(prev_field));
            metrics.set(change_field, change);
        } else if metrics.contains(change_field) {
            metrics.set(change_field, None);
        }
    }

    if metrics.contains(fields::MCAP) || metrics.contains(fields::MCAPTVL) {
        let ratio = mcap_tvl_ratio(metrics.get(fields::MCAP), metrics.get(fields::TVL));
        metrics.set(fields::MCAPTVL, ratio);
    }
}
