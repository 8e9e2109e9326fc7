//! Compose a base metric snapshot with toggle-selected extra categories.
//!
//! Raw feeds already include double-counted value. Composition:
//! 1. starts from the base value (which may be null)
//! 2. subtracts the `doublecounted` contribution when asked to
//! 3. adds every other category the toggle set switches on, except the
//!    ones raw feeds already include (`liquidstaking`, `dcandlsoverlap`)
//! 4. re-derives percent changes and `mcaptvl`
//!
//! A null running value is "no data yet": the first real contribution
//! replaces it instead of being added to zero.

use super::{refresh_derived, TVL_CHANGES};
use crate::schema::fields;
use crate::schema::{ExtraBreakdown, MetricSnapshot, ToggleSet};
use crate::utils::config::{
    DC_AND_LS_OVERLAP, DOUBLECOUNTED, LIQUID_STAKING, PRE_INCLUDED_CATEGORIES,
};
use crate::utils::math::add_observed;
use std::collections::BTreeSet;

/// Compose every scalar field of a snapshot
///
/// **Public** - main entry point for single-snapshot composition
///
/// # Arguments
/// * `base` - Raw snapshot (double-counted value included)
/// * `breakdown` - Per-category contributions
/// * `toggles` - Categories the user opted into
/// * `apply_doublecounted` - Subtract the `doublecounted` contribution
///
/// # Returns
/// A new snapshot holding every field of `base` plus every field a
/// contributing category supplied, with derived fields re-derived.
pub fn compose(
    base: &MetricSnapshot,
    breakdown: &ExtraBreakdown,
    toggles: &ToggleSet,
    apply_doublecounted: bool,
) -> MetricSnapshot {
    let mut field_names: BTreeSet<&str> = base.fields().collect();
    for (_, contribution) in breakdown.iter() {
        field_names.extend(contribution.fields());
    }

    let mut composed = MetricSnapshot::new();
    for field in field_names {
        if fields::is_derived(field) {
            if base.contains(field) {
                composed.set(field, None);
            }
            continue;
        }

        let value = compose_field(
            base.get(field),
            breakdown,
            field,
            toggles,
            apply_doublecounted,
        );
        if base.contains(field) || value.is_some() {
            composed.set(field, value);
        }
    }

    refresh_derived(&mut composed, &TVL_CHANGES);
    composed
}

/// Compose a single field
///
/// **Public** - shared by snapshot and time-series composition
pub fn compose_field(
    base: Option<f64>,
    breakdown: &ExtraBreakdown,
    field: &str,
    toggles: &ToggleSet,
    apply_doublecounted: bool,
) -> Option<f64> {
    let mut value = base;

    if apply_doublecounted {
        if let Some(doublecounted) = breakdown.get(DOUBLECOUNTED).and_then(|c| c.get(field)) {
            value = add_observed(value, Some(-doublecounted));
        }
    }

    add_enabled_categories(value, breakdown, field, toggles)
}

/// Compose a single field for chart data
///
/// **Public** - used by time-series composition
///
/// Raw chart values include both double-counted and liquid-staking value.
/// Each is removed unless its toggle is on; the overlap between the two is
/// added back whenever at least one of them was removed.
pub fn compose_chart_field(
    base: Option<f64>,
    breakdown: &ExtraBreakdown,
    field: &str,
    toggles: &ToggleSet,
) -> Option<f64> {
    let contribution = |category: &str| breakdown.get(category).and_then(|c| c.get(field));
    let keep_doublecounted = toggles.is_enabled(DOUBLECOUNTED);
    let keep_liquid_staking = toggles.is_enabled(LIQUID_STAKING);

    let mut value = base;
    if !keep_doublecounted {
        value = add_observed(value, contribution(DOUBLECOUNTED).map(|v| -v));
    }
    if !keep_liquid_staking {
        value = add_observed(value, contribution(LIQUID_STAKING).map(|v| -v));
    }
    if !keep_doublecounted || !keep_liquid_staking {
        value = add_observed(value, contribution(DC_AND_LS_OVERLAP));
    }

    add_enabled_categories(value, breakdown, field, toggles)
}

/// Add every toggled category that raw feeds do not already include
fn add_enabled_categories(
    mut value: Option<f64>,
    breakdown: &ExtraBreakdown,
    field: &str,
    toggles: &ToggleSet,
) -> Option<f64> {
    for (category, contribution) in breakdown.iter() {
        if PRE_INCLUDED_CATEGORIES.contains(&category) || !toggles.is_enabled(category) {
            continue;
        }
        value = add_observed(value, contribution.get(field));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown() -> ExtraBreakdown {
        ExtraBreakdown::new()
            .with("doublecounted", MetricSnapshot::from([("tvl", 200.0)]))
            .with("staking", MetricSnapshot::from([("tvl", 50.0), ("tvlPrevDay", 40.0)]))
    }

    #[test]
    fn test_doublecounted_untouched_by_default() {
        let base = MetricSnapshot::from([("tvl", 1000.0)]);
        let composed = compose(&base, &breakdown(), &ToggleSet::new(), false);
        assert_eq!(composed.get("tvl"), Some(1000.0));
    }

    #[test]
    fn test_doublecounted_subtracted_when_applied() {
        let base = MetricSnapshot::from([("tvl", 1000.0)]);
        let composed = compose(&base, &breakdown(), &ToggleSet::new(), true);
        assert_eq!(composed.get("tvl"), Some(800.0));
    }

    #[test]
    fn test_enabled_category_added_case_insensitively() {
        let base = MetricSnapshot::from([("tvl", 1000.0), ("tvlPrevDay", 900.0)]);
        let toggles = ToggleSet::new().with("STAKING", true);
        let composed = compose(&base, &breakdown(), &toggles, false);

        assert_eq!(composed.get("tvl"), Some(1050.0));
        assert_eq!(composed.get("tvlPrevDay"), Some(940.0));
        assert!(composed.get("change_1d").is_some());
    }

    #[test]
    fn test_null_base_flipped_by_first_contribution() {
        let mut base = MetricSnapshot::new();
        base.set("tvl", None);
        let toggles = ToggleSet::from_enabled(["staking"]);
        let composed = compose(&base, &breakdown(), &toggles, false);
        assert_eq!(composed.get("tvl"), Some(50.0));
    }

    #[test]
    fn test_zero_contribution_keeps_real_value() {
        let breakdown = ExtraBreakdown::new()
            .with("pool2", MetricSnapshot::from([("tvl", 0.0)]))
            .with("staking", MetricSnapshot::from([("tvl", 5.0)]));
        let toggles = ToggleSet::from_enabled(["pool2", "staking"]);

        let value = compose_field(None, &breakdown, "tvl", &toggles, false);
        assert_eq!(value, Some(5.0));
    }

    #[test]
    fn test_disabled_category_does_not_create_field() {
        let base = MetricSnapshot::from([("tvl", 10.0)]);
        let composed = compose(&base, &breakdown(), &ToggleSet::new(), false);
        assert!(!composed.contains("tvlPrevDay"));
    }

    #[test]
    fn test_mcaptvl_rederived_not_composed() {
        let base = MetricSnapshot::from([("tvl", 1000.0), ("mcap", 500.0), ("mcaptvl", 0.5)]);
        let breakdown = ExtraBreakdown::new()
            .with("borrowed", MetricSnapshot::from([("tvl", 250.0), ("mcaptvl", 99.0)]));
        let toggles = ToggleSet::from_enabled(["borrowed"]);

        let composed = compose(&base, &breakdown, &toggles, false);
        assert_eq!(composed.get("tvl"), Some(1250.0));
        assert_eq!(composed.get("mcaptvl"), Some(0.4));
    }

    #[test]
    fn test_zero_tvl_gives_null_ratio() {
        let base = MetricSnapshot::from([("tvl", 200.0), ("mcap", 500.0)]);
        let composed = compose(&base, &breakdown(), &ToggleSet::new(), true);
        assert_eq!(composed.get("tvl"), Some(0.0));
        assert_eq!(composed.get("mcaptvl"), None);
    }

    fn staking_breakdown() -> ExtraBreakdown {
        ExtraBreakdown::new()
            .with("liquidstaking", MetricSnapshot::from([("tvl", 40.0)]))
            .with("doublecounted", MetricSnapshot::from([("tvl", 30.0)]))
            .with("dcAndLsOverlap", MetricSnapshot::from([("tvl", 10.0)]))
    }

    #[test]
    fn test_liquid_staking_never_added() {
        let base = MetricSnapshot::from([("tvl", 1000.0)]);
        let breakdown =
            ExtraBreakdown::new().with("liquidstaking", MetricSnapshot::from([("tvl", 1000.0)]));
        let toggles = ToggleSet::from_enabled(["liquidstaking"]);

        let composed = compose(&base, &breakdown, &toggles, false);
        assert_eq!(composed.get("tvl"), Some(1000.0));
    }

    #[test]
    fn test_chart_field_removes_pre_included_categories() {
        let toggles = ToggleSet::new();
        let value = compose_chart_field(Some(100.0), &staking_breakdown(), "tvl", &toggles);
        // 100 - 30 - 40 + 10
        assert_eq!(value, Some(40.0));
    }

    #[test]
    fn test_chart_field_keeps_liquid_staking_when_toggled() {
        let toggles = ToggleSet::from_enabled(["liquidstaking"]);
        let value = compose_chart_field(Some(100.0), &staking_breakdown(), "tvl", &toggles);
        // 100 - 30 + 10
        assert_eq!(value, Some(80.0));
    }

    #[test]
    fn test_chart_field_overlap_only_when_something_removed() {
        let toggles = ToggleSet::from_enabled(["liquidstaking", "doublecounted"]);
        let value = compose_chart_field(Some(100.0), &staking_breakdown(), "tvl", &toggles);
        assert_eq!(value, Some(100.0));
    }
}
