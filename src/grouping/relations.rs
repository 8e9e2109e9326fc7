//! Grouping relations: which children roll up into which parent.
//!
//! Relations are static configuration, loaded from TOML:
//!
//! ```toml
//! enabled_group_types = ["L2"]
//!
//! [[relations]]
//! parent = "Ethereum"
//! group_type = "L2"
//! children = ["Arbitrum", "Optimism"]
//! ```

use crate::utils::error::ConfigError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Children of one parent under one group type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingRelation {
    #[serde(rename = "parentName", alias = "parent")]
    pub parent_name: String,

    #[serde(rename = "groupType", alias = "group_type")]
    pub group_type: String,

    #[serde(default)]
    pub children: Vec<String>,
}

impl GroupingRelation {
    pub fn new<I, S>(parent_name: &str, group_type: &str, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent_name: parent_name.to_string(),
            group_type: group_type.to_string(),
            children: children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Complete grouping configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Group types the user has switched on
    #[serde(default)]
    pub enabled_group_types: BTreeSet<String>,

    /// Relations in declaration order
    #[serde(default)]
    pub relations: Vec<GroupingRelation>,
}

impl GroupingConfig {
    /// Distinct parent names in order of first declaration
    pub fn parent_names(&self) -> Vec<&str> {
        parent_names(&self.relations)
    }
}

/// Distinct parent names in order of first declaration
pub fn parent_names(relations: &[GroupingRelation]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    relations
        .iter()
        .map(|r| r.parent_name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Load grouping configuration from a TOML file
///
/// # Errors
/// * `ConfigError::ReadFailed` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
pub fn load_grouping_config(path: impl AsRef<Path>) -> Result<GroupingConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading grouping config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    parse_grouping_config(&contents)
}

/// Parse grouping configuration from TOML text
pub fn parse_grouping_config(contents: &str) -> Result<GroupingConfig, ConfigError> {
    let config: GroupingConfig = toml::from_str(contents)?;

    for relation in config.relations.iter().filter(|r| r.children.is_empty()) {
        warn!(
            "Relation '{}' ({}) lists no children and will never produce a parent",
            relation.parent_name, relation.group_type
        );
    }

    debug!(
        "Loaded {} relations for {} parents, {} group types enabled",
        config.relations.len(),
        config.parent_names().len(),
        config.enabled_group_types.len()
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
enabled_group_types = ["L2"]

[[relations]]
parent = "Ethereum"
group_type = "L2"
children = ["Arbitrum", "Optimism"]

[[relations]]
parent = "Cosmos"
group_type = "cosmos"
children = ["Osmosis"]

[[relations]]
parent = "Ethereum"
group_type = "rollup"
children = ["Base"]
"#;

    #[test]
    fn test_parse_grouping_config() {
        let config = parse_grouping_config(CONFIG).unwrap();
        assert_eq!(config.relations.len(), 3);
        assert!(config.enabled_group_types.contains("L2"));
        assert_eq!(config.relations[0].children, vec!["Arbitrum", "Optimism"]);
    }

    #[test]
    fn test_parent_names_keep_declaration_order() {
        let config = parse_grouping_config(CONFIG).unwrap();
        assert_eq!(config.parent_names(), vec!["Ethereum", "Cosmos"]);
    }

    #[test]
    fn test_invalid_config() {
        let result = parse_grouping_config("relations = 5");
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_json_field_names() {
        let relation: GroupingRelation = serde_json::from_str(
            r#"{"parentName": "Ethereum", "groupType": "L2", "children": ["Arbitrum"]}"#,
        )
        .unwrap();
        assert_eq!(relation, GroupingRelation::new("Ethereum", "L2", ["Arbitrum"]));
    }
}
