//! Generic named entity rows (chains, pegged assets on a chain).

use super::snapshot::MetricSnapshot;
use serde::{Deserialize, Serialize};

/// A named row of metrics, optionally carrying the children it was built from
///
/// `sub_rows` is only ever populated on synthesized parent rows; raw leaf
/// rows never carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,

    #[serde(flatten)]
    pub metrics: MetricSnapshot,

    #[serde(rename = "subRows", default, skip_serializing_if = "Option::is_none")]
    pub sub_rows: Option<Vec<Entity>>,
}

impl Entity {
    pub fn new(name: impl Into<String>, metrics: MetricSnapshot) -> Self {
        Self {
            name: name.into(),
            metrics,
            sub_rows: None,
        }
    }

    /// Names of the direct children, empty for leaf rows
    pub fn child_names(&self) -> Vec<&str> {
        self.sub_rows
            .iter()
            .flatten()
            .map(|child| child.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_json_shape() {
        let entity: Entity =
            serde_json::from_str(r#"{"name": "Arbitrum", "tvl": 100.0, "mcap": null}"#).unwrap();
        assert_eq!(entity.name, "Arbitrum");
        assert_eq!(entity.metrics.get("tvl"), Some(100.0));
        assert!(entity.sub_rows.is_none());

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["tvl"], 100.0);
        assert!(json.get("subRows").is_none());
    }
}
