//! Compose a date-indexed series and accumulate per-date totals.
//!
//! Each date holds one snapshot per named entity (a chain, a token, ...).
//! The chosen scalar (`tvl`, `circulating`, ...) of every entity is composed
//! with the chart rule, which also removes liquid-staking value unless it is
//! toggled on. The daily total is the sum of the composed values, never of
//! the raw ones.

use super::extra::compose_chart_field;
use crate::schema::{ExtraBreakdown, MetricSnapshot, ToggleSet};
use crate::utils::math::dominance_percent;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entity's raw snapshot on one date, with its category breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotWithBreakdown {
    #[serde(flatten)]
    pub metrics: MetricSnapshot,

    #[serde(rename = "extra", default, skip_serializing_if = "ExtraBreakdown::is_empty")]
    pub breakdown: ExtraBreakdown,
}

impl SnapshotWithBreakdown {
    pub fn new(metrics: MetricSnapshot, breakdown: ExtraBreakdown) -> Self {
        Self { metrics, breakdown }
    }
}

/// `[date, { entityName: snapshot }]`, date as unix seconds
pub type SeriesPoint = (i64, BTreeMap<String, SnapshotWithBreakdown>);

/// Composed values per date and entity, plus the per-date total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesComposition {
    #[serde(rename = "perEntity")]
    pub per_entity: BTreeMap<i64, BTreeMap<String, f64>>,

    #[serde(rename = "dailyTotal")]
    pub daily_total: BTreeMap<i64, f64>,
}

impl SeriesComposition {
    /// Each entity's share of its date's total, in percent
    pub fn dominance(&self) -> BTreeMap<i64, BTreeMap<String, f64>> {
        self.per_entity
            .iter()
            .map(|(date, values)| {
                let total = self.daily_total.get(date).copied().unwrap_or(0.0);
                let shares = values
                    .iter()
                    .map(|(name, value)| (name.clone(), dominance_percent(*value, total)))
                    .collect();
                (*date, shares)
            })
            .collect()
    }
}

/// Compose one scalar field across a whole series
///
/// **Public** - main entry point for chart data
///
/// # Arguments
/// * `series` - Date rows of per-entity snapshots
/// * `field` - Scalar to compose (e.g. `"tvl"`)
/// * `toggles` - Categories the user opted into; `doublecounted` and
///   `liquidstaking` decide whether those pre-included values are kept
///
/// # Returns
/// Composed values per entity and the daily totals. A value with no data
/// and no contributions counts as `0`.
pub fn compose_series(series: &[SeriesPoint], field: &str, toggles: &ToggleSet) -> SeriesComposition {
    debug!("Composing '{}' across {} dates", field, series.len());

    let mut per_entity: BTreeMap<i64, BTreeMap<String, f64>> = BTreeMap::new();

    for (date, entities) in series {
        let row = per_entity.entry(*date).or_default();
        for (name, snapshot) in entities {
            let value = compose_chart_field(
                snapshot.metrics.get(field),
                &snapshot.breakdown,
                field,
                toggles,
            )
            .unwrap_or(0.0);
            row.insert(name.clone(), value);
        }
    }

    // Totals are taken from the composed map so repeated dates stay consistent
    let daily_total: BTreeMap<i64, f64> = per_entity
        .iter()
        .map(|(date, values)| (*date, values.values().sum::<f64>()))
        .collect();

    SeriesComposition {
        per_entity,
        daily_total,
    }
}
