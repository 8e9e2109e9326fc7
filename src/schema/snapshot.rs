//! Metric snapshots and their per-category extra breakdowns.

use crate::utils::math::add_observed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record of named numeric fields, each possibly `null`
///
/// A field that is absent and a field that is present with `None` both read
/// as "no data"; only `Some(0.0)` means zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSnapshot(BTreeMap<String, Option<f64>>);

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, `None` if absent or null
    pub fn get(&self, field: &str) -> Option<f64> {
        self.0.get(field).copied().flatten()
    }

    /// Whether the field key is present at all (even as null)
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Option<f64>) {
        self.0.insert(field.into(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<f64> {
        self.0.remove(field).flatten()
    }

    /// Builder-style setter
    pub fn with(mut self, field: impl Into<String>, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Field names in sorted order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Additively merge another snapshot's value for `field` into this one
    pub fn absorb(&mut self, field: &str, value: Option<f64>) {
        let merged = add_observed(self.get(field), value);
        if merged.is_some() || self.contains(field) {
            self.set(field, merged);
        }
    }
}

impl<const N: usize> From<[(&str, f64); N]> for MetricSnapshot {
    fn from(pairs: [(&str, f64); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), Some(v)))
                .collect(),
        )
    }
}

impl FromIterator<(String, Option<f64>)> for MetricSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Option<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-category contributions to a base metric (`"doublecounted"`, `"liquidstaking"`, ...)
///
/// Category keys are normalized to lowercase on construction so every later
/// lookup is an exact-key match. Upstream feeds are not consistent about
/// casing; two keys that collide after lowercasing are merged additively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, MetricSnapshot>",
    into = "BTreeMap<String, MetricSnapshot>"
)]
pub struct ExtraBreakdown(BTreeMap<String, MetricSnapshot>);

impl ExtraBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category, merging with an existing entry of the same lowercase name
    pub fn insert(&mut self, category: &str, snapshot: MetricSnapshot) {
        match self.0.get_mut(&category.to_lowercase()) {
            Some(existing) => {
                for (field, value) in snapshot.iter() {
                    existing.absorb(field, value);
                }
            }
            None => {
                self.0.insert(category.to_lowercase(), snapshot);
            }
        }
    }

    pub fn with(mut self, category: &str, snapshot: MetricSnapshot) -> Self {
        self.insert(category, snapshot);
        self
    }

    pub fn get(&self, category: &str) -> Option<&MetricSnapshot> {
        self.0.get(&category.to_lowercase())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(&category.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricSnapshot)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, MetricSnapshot>> for ExtraBreakdown {
    fn from(raw: BTreeMap<String, MetricSnapshot>) -> Self {
        let mut breakdown = Self::new();
        for (category, snapshot) in raw {
            breakdown.insert(&category, snapshot);
        }
        breakdown
    }
}

impl From<ExtraBreakdown> for BTreeMap<String, MetricSnapshot> {
    fn from(breakdown: ExtraBreakdown) -> Self {
        breakdown.0
    }
}
