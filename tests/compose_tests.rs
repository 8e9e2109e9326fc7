use metrics_aggregator::compose::{compose, compose_series, format_protocols_list, SnapshotWithBreakdown};
use metrics_aggregator::schema::{ExtraBreakdown, MetricSnapshot, ParentSpec, ProtocolRow, ToggleSet};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn breakdown() -> ExtraBreakdown {
    ExtraBreakdown::new()
        .with(
            "doublecounted",
            MetricSnapshot::from([("tvl", 200.0), ("tvlPrevDay", 150.0)]),
        )
        .with(
            "staking",
            MetricSnapshot::from([("tvl", 40.0), ("tvlPrevDay", 30.0)]),
        )
}

// ============================================================================
// Snapshot composition
// ============================================================================

#[test]
fn test_doublecounted_example() {
    let base = MetricSnapshot::from([("tvl", 1000.0)]);
    let breakdown = ExtraBreakdown::new().with("doublecounted", MetricSnapshot::from([("tvl", 200.0)]));
    let toggles = ToggleSet::new();

    assert_eq!(compose(&base, &breakdown, &toggles, false).get("tvl"), Some(1000.0));
    assert_eq!(compose(&base, &breakdown, &toggles, true).get("tvl"), Some(800.0));
}

#[test]
fn test_compose_is_idempotent() {
    let base = MetricSnapshot::from([("tvl", 1000.0), ("tvlPrevDay", 900.0), ("mcap", 300.0)]);
    let toggles = ToggleSet::from_enabled(["staking"]);

    let first = compose(&base, &breakdown(), &toggles, true);
    let second = compose(&base, &breakdown(), &toggles, true);

    assert_eq!(first, second);
}

#[test]
fn test_doublecounted_reversibility() {
    let base = MetricSnapshot::from([("tvl", 1000.0), ("tvlPrevDay", 900.0)]);
    let toggles = ToggleSet::from_enabled(["staking"]);

    let kept = compose(&base, &breakdown(), &toggles, false);
    let subtracted = compose(&base, &breakdown(), &toggles, true);

    for (field, contribution) in [("tvl", 200.0), ("tvlPrevDay", 150.0)] {
        let diff = kept.get(field).unwrap() - subtracted.get(field).unwrap();
        assert!((diff - contribution).abs() < 1e-9, "{field}: {diff}");
    }

    let untouched = compose(&base, &breakdown(), &ToggleSet::new(), false);
    assert_eq!(untouched.get("tvl"), Some(1000.0));
    assert_eq!(untouched.get("tvlPrevDay"), Some(900.0));
}

#[test]
fn test_composed_change_uses_composed_values() {
    let base = MetricSnapshot::from([("tvl", 1000.0), ("tvlPrevDay", 900.0)]);
    let toggles = ToggleSet::from_enabled(["staking"]);

    let composed = compose(&base, &breakdown(), &toggles, true);

    // (840 - 780) / 780
    let change = composed.get("change_1d").unwrap();
    assert!((change - 7.6923).abs() < 1e-3);
}

// ============================================================================
// Series composition
// ============================================================================

#[test]
fn test_series_daily_total_and_dominance() {
    let mut day: BTreeMap<String, SnapshotWithBreakdown> = BTreeMap::new();
    day.insert(
        "Ethereum".to_string(),
        SnapshotWithBreakdown::new(MetricSnapshot::from([("tvl", 300.0)]), breakdown()),
    );
    day.insert(
        "Solana".to_string(),
        SnapshotWithBreakdown::new(MetricSnapshot::from([("tvl", 100.0)]), ExtraBreakdown::new()),
    );
    let series = vec![(1_700_000_000, day)];

    let composition = compose_series(&series, "tvl", &ToggleSet::new());

    assert_eq!(composition.per_entity[&1_700_000_000]["Ethereum"], 100.0);
    assert_eq!(composition.daily_total[&1_700_000_000], 200.0);
    assert_eq!(composition.dominance()[&1_700_000_000]["Solana"], 50.0);
}

#[test]
fn test_series_input_shape() {
    let series: Vec<metrics_aggregator::compose::SeriesPoint> = serde_json::from_str(
        r#"[[1700000000, {"Ethereum": {"tvl": 10, "extra": {"Staking": {"tvl": 5}}}}]]"#,
    )
    .unwrap();

    let composition = compose_series(&series, "tvl", &ToggleSet::from_enabled(["staking"]));
    assert_eq!(composition.daily_total[&1_700_000_000], 15.0);
}

// ============================================================================
// Protocols table
// ============================================================================

#[test]
fn test_format_protocols_list_end_to_end() {
    let protocols = vec![
        ProtocolRow {
            tvl: Some(100.0),
            tvl_prev_day: Some(80.0),
            ..ProtocolRow::new("Aave V2").with_parent("parent#aave")
        },
        ProtocolRow {
            tvl: Some(50.0),
            tvl_prev_day: Some(60.0),
            ..ProtocolRow::new("Aave V3").with_parent("parent#aave")
        },
        ProtocolRow {
            tvl: Some(500.0),
            ..ProtocolRow::new("Lido")
        },
    ];
    let parents = vec![ParentSpec::new("parent#aave", "Aave")];

    let rows = format_protocols_list(&protocols, &parents, &ToggleSet::new(), false);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(names, vec!["Lido", "Aave"]);
    assert_eq!(rows[1].tvl, Some(150.0));
    assert_eq!(rows[1].sub_rows.as_ref().map(Vec::len), Some(2));
}

#[test]
fn test_liquid_staking_rows_struck_unless_toggled() {
    let protocols = vec![ProtocolRow {
        tvl: Some(10.0),
        category: Some("Liquid Staking".to_string()),
        ..ProtocolRow::new("Lido")
    }];

    let rows = format_protocols_list(&protocols, &[], &ToggleSet::new(), false);
    assert!(rows[0].strike_tvl);

    let toggles = ToggleSet::from_enabled(["liquidstaking"]);
    let rows = format_protocols_list(&protocols, &[], &toggles, false);
    assert!(!rows[0].strike_tvl);
}

#[test]
fn test_liquid_staking_toggle_never_inflates_table_tvl() {
    let protocols = vec![ProtocolRow {
        tvl: Some(1000.0),
        category: Some("Liquid Staking".to_string()),
        extra_tvl: ExtraBreakdown::new()
            .with("liquidstaking", MetricSnapshot::from([("tvl", 1000.0)])),
        ..ProtocolRow::new("Lido")
    }];

    let off = format_protocols_list(&protocols, &[], &ToggleSet::new(), false);
    let toggles = ToggleSet::from_enabled(["liquidstaking"]);
    let on = format_protocols_list(&protocols, &[], &toggles, false);

    assert_eq!((off[0].tvl, off[0].strike_tvl), (Some(1000.0), true));
    assert_eq!((on[0].tvl, on[0].strike_tvl), (Some(1000.0), false));
}

#[test]
fn test_series_liquid_staking_and_overlap() {
    let breakdown = ExtraBreakdown::new()
        .with("liquidstaking", MetricSnapshot::from([("tvl", 40.0)]))
        .with("doublecounted", MetricSnapshot::from([("tvl", 20.0)]))
        .with("dcAndLsOverlap", MetricSnapshot::from([("tvl", 5.0)]));
    let day = BTreeMap::from([(
        "Ethereum".to_string(),
        SnapshotWithBreakdown::new(MetricSnapshot::from([("tvl", 100.0)]), breakdown),
    )]);
    let series = vec![(1, day)];

    let value = |toggles: ToggleSet| compose_series(&series, "tvl", &toggles).daily_total[&1];

    assert_eq!(value(ToggleSet::new()), 45.0);
    assert_eq!(value(ToggleSet::from_enabled(["liquidstaking"])), 85.0);
    assert_eq!(value(ToggleSet::from_enabled(["doublecounted"])), 65.0);
    assert_eq!(value(ToggleSet::from_enabled(["doublecounted", "liquidstaking"])), 100.0);
}
