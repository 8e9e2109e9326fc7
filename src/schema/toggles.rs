//! User-controlled toggles for optional breakdown categories.

use crate::utils::config::DOUBLECOUNTED;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category name -> "include this category's contribution"
///
/// Names are matched case-insensitively; they are lowercased once on
/// construction. The toggle set is always passed explicitly; there is no
/// ambient toggle state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct ToggleSet(BTreeMap<String, bool>);

impl ToggleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a toggle set with every named category switched on
    pub fn from_enabled<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().fold(Self::new(), |set, name| set.with(name.as_ref(), true))
    }

    pub fn set(&mut self, category: &str, enabled: bool) {
        self.0.insert(category.to_lowercase(), enabled);
    }

    pub fn with(mut self, category: &str, enabled: bool) -> Self {
        self.set(category, enabled);
        self
    }

    pub fn is_enabled(&self, category: &str) -> bool {
        self.0.get(&category.to_lowercase()).copied().unwrap_or(false)
    }

    /// Whether double-counted value should be removed from the base
    ///
    /// Raw feeds include double-counted value; it is taken out unless the
    /// user switched the `doublecounted` toggle on.
    pub fn subtracts_doublecounted(&self) -> bool {
        !self.is_enabled(DOUBLECOUNTED)
    }

    /// Lowercased names of every enabled category
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
    }
}

impl From<BTreeMap<String, bool>> for ToggleSet {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        raw.into_iter()
            .fold(Self::new(), |set, (name, on)| set.with(&name, on))
    }
}

impl From<ToggleSet> for BTreeMap<String, bool> {
    fn from(toggles: ToggleSet) -> Self {
        toggles.0
    }
}
