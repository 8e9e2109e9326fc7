//! Numeric helpers shared by the composers and groupers.
//!
//! All helpers map non-finite results (division by zero, `NaN`, `Infinity`)
//! to `None` so that callers never propagate garbage into table rows.

use super::config::ANNUALIZATION_FACTOR;

/// Keep a value only if it is finite
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Standard percent change between a current and a previous value
///
/// **Public** - used for `change_1d`, `change_7d`, `change_1m`
///
/// Returns `None` when either side is missing or the base is zero.
pub fn percent_change(now: Option<f64>, prev: Option<f64>) -> Option<f64> {
    let (now, prev) = (now?, prev?);
    finite((now - prev) / prev * 100.0)
}

/// Ratio of market cap to annualized trailing 30d fees or revenue (P/F, P/S)
pub fn annualized_ratio(mcap: Option<f64>, trailing_30d: Option<f64>) -> Option<f64> {
    match (mcap, trailing_30d) {
        (Some(mcap), Some(total)) if mcap != 0.0 && total != 0.0 => {
            finite(mcap / (total * ANNUALIZATION_FACTOR)).map(round2)
        }
        _ => None,
    }
}

/// Market cap over TVL, rounded to 2 decimals
pub fn mcap_tvl_ratio(mcap: Option<f64>, tvl: Option<f64>) -> Option<f64> {
    match (mcap, tvl) {
        (Some(mcap), Some(tvl)) if tvl != 0.0 => finite(mcap / tvl).map(round2),
        _ => None,
    }
}

/// Share of `total` held by `value`, in percent with 2 decimals
///
/// Zero or missing inputs yield `0.0`.
pub fn dominance_percent(value: f64, total: f64) -> f64 {
    if value == 0.0 || total <= 0.0 {
        return 0.0;
    }
    finite(value / total * 100.0).map(round2).unwrap_or(0.0)
}

/// Add an observation to a running total, keeping "no data" distinct from zero
///
/// A missing running total is flipped to the first real observation.
pub fn add_observed(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (acc, None) => acc,
        (None, Some(v)) => Some(v),
        (Some(a), Some(v)) => Some(a + v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change() {
        let change = percent_change(Some(150.0), Some(140.0)).unwrap();
        assert!((change - 7.142857).abs() < 1e-5);
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(Some(10.0), Some(0.0)), None);
        assert_eq!(percent_change(Some(0.0), Some(0.0)), None);
        assert_eq!(percent_change(None, Some(1.0)), None);
    }

    #[test]
    fn test_annualized_ratio() {
        assert_eq!(annualized_ratio(Some(1220.0), Some(10.0)), Some(10.0));
        assert_eq!(annualized_ratio(Some(0.0), Some(10.0)), None);
        assert_eq!(annualized_ratio(Some(1.0), None), None);
    }

    #[test]
    fn test_mcap_tvl_ratio() {
        assert_eq!(mcap_tvl_ratio(Some(1000.0), Some(300.0)), Some(3.33));
        assert_eq!(mcap_tvl_ratio(Some(1000.0), Some(0.0)), None);
        assert_eq!(mcap_tvl_ratio(None, Some(10.0)), None);
    }

    #[test]
    fn test_dominance_percent() {
        assert_eq!(dominance_percent(25.0, 100.0), 25.0);
        assert_eq!(dominance_percent(1.0, 3.0), 33.33);
        assert_eq!(dominance_percent(5.0, 0.0), 0.0);
        assert_eq!(dominance_percent(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_add_observed_keeps_none_until_first_value() {
        assert_eq!(add_observed(None, None), None);
        assert_eq!(add_observed(None, Some(0.0)), Some(0.0));
        assert_eq!(add_observed(Some(2.0), Some(3.0)), Some(5.0));
        assert_eq!(add_observed(Some(2.0), None), Some(2.0));
    }
}
