//! Group child entities (sub-chains, chains of a pegged asset) under a
//! parent according to the enabled group types.
//!
//! The grouper is generic over an [`EntityKind`], which names the fields
//! that add up, the field rows are ranked by, and how derived fields are
//! refreshed once a parent is complete.

use super::relations::{parent_names, GroupingRelation};
use crate::compose::{refresh_derived, MCAP_CHANGES, TVL_CHANGES};
use crate::schema::fields;
use crate::schema::{Entity, MetricSnapshot};
use log::debug;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Schema of one kind of groupable entity
pub trait EntityKind {
    /// Human-readable kind name for logs
    const LABEL: &'static str;

    /// Field output rows are sorted by (descending)
    const RANK_FIELD: &'static str;

    /// Fields that are summed from children into the parent
    const ADDITIVE_FIELDS: &'static [&'static str];

    /// Re-derive ratio and change fields after all merges
    fn finalize(metrics: &mut MetricSnapshot);
}

/// Chains ranked by TVL
pub struct ChainKind;

impl EntityKind for ChainKind {
    const LABEL: &'static str = "chain";
    const RANK_FIELD: &'static str = fields::TVL;
    const ADDITIVE_FIELDS: &'static [&'static str] = &[
        fields::TVL,
        fields::TVL_PREV_DAY,
        fields::TVL_PREV_WEEK,
        fields::TVL_PREV_MONTH,
        fields::MCAP,
    ];

    fn finalize(metrics: &mut MetricSnapshot) {
        refresh_derived(metrics, &TVL_CHANGES);
    }
}

/// Pegged-asset supply per chain, ranked by market cap
pub struct PeggedKind;

impl EntityKind for PeggedKind {
    const LABEL: &'static str = "pegged";
    const RANK_FIELD: &'static str = fields::MCAP;
    const ADDITIVE_FIELDS: &'static [&'static str] = &[
        fields::MCAP,
        fields::MCAP_PREV_DAY,
        fields::MCAP_PREV_WEEK,
        fields::MCAP_PREV_MONTH,
        fields::CIRCULATING,
        fields::UNRELEASED,
        fields::BRIDGED_TO,
        fields::MINTED,
    ];

    fn finalize(metrics: &mut MetricSnapshot) {
        // Dominance is relative to the chain's own total and has no meaning for a group
        if metrics.contains(fields::DOMINANCE) {
            metrics.set(fields::DOMINANCE, None);
        }
        refresh_derived(metrics, &MCAP_CHANGES);
    }
}

/// Merge children into parents and return parents plus untouched leaves
///
/// **Public** - main entry point for chain/pegged grouping
///
/// # Arguments
/// * `entities` - Raw leaf rows
/// * `relations` - Parent/child relations in declaration order
/// * `enabled_group_types` - Group types whose relations are applied
///
/// # Returns
/// Rows sorted by `K::RANK_FIELD` descending; equal ranks keep their
/// relative order. Every merged child appears only inside its parent's
/// `sub_rows`. A parent name already merged into an earlier parent is not
/// built again, so its own children stay as leaves unless claimed elsewhere.
pub fn group_entities<K: EntityKind>(
    entities: &[Entity],
    relations: &[GroupingRelation],
    enabled_group_types: &BTreeSet<String>,
) -> Vec<Entity> {
    debug!(
        "Grouping {} {} rows with {} relations",
        entities.len(),
        K::LABEL,
        relations.len()
    );

    let mut by_name: HashMap<&str, &Entity> = HashMap::new();
    for entity in entities {
        by_name.entry(entity.name.as_str()).or_insert(entity);
    }

    let mut added: HashSet<&str> = HashSet::new();
    let mut grouped: Vec<Entity> = Vec::new();

    for parent_name in parent_names(relations) {
        // A name already merged into an earlier parent stays nested there
        if added.contains(parent_name) {
            debug!(
                "Skipping {} parent {}: already grouped as a child",
                K::LABEL,
                parent_name
            );
            continue;
        }
        let seed = by_name.get(parent_name).copied();

        let mut parent = Entity {
            name: parent_name.to_string(),
            metrics: seed.map(|s| s.metrics.clone()).unwrap_or_default(),
            sub_rows: None,
        };
        let mut sub_rows: Vec<Entity> = seed.into_iter().cloned().collect();
        if seed.is_some() {
            added.insert(parent_name);
        }

        let parent_relations = relations.iter().filter(|r| r.parent_name == parent_name);
        for relation in parent_relations {
            if !enabled_group_types.contains(&relation.group_type) {
                debug!("Skipping '{}' group of {}", relation.group_type, parent_name);
                continue;
            }

            for child_name in &relation.children {
                let child_name = child_name.as_str();
                if child_name == parent_name || added.contains(child_name) {
                    continue;
                }
                let Some(child) = by_name.get(child_name) else {
                    continue;
                };

                for field in K::ADDITIVE_FIELDS {
                    parent.metrics.absorb(field, child.metrics.get(field));
                }
                sub_rows.push((*child).clone());
                added.insert(child_name);
            }
        }

        let merged_children = sub_rows.len() - usize::from(seed.is_some());
        if merged_children == 0 {
            match seed {
                Some(standalone) => grouped.push(standalone.clone()),
                None => debug!("Discarding {} parent {}: no children", K::LABEL, parent_name),
            }
            continue;
        }

        K::finalize(&mut parent.metrics);
        parent.sub_rows = Some(sub_rows);
        debug!("Built {} parent {} from {} children", K::LABEL, parent_name, merged_children);
        grouped.push(parent);
    }

    grouped.extend(
        entities
            .iter()
            .filter(|entity| !added.contains(entity.name.as_str()))
            .cloned(),
    );

    sort_by_rank(&mut grouped, K::RANK_FIELD);
    grouped
}

/// Stable descending sort, missing values ranked as zero
fn sort_by_rank(rows: &mut [Entity], field: &str) {
    rows.sort_by(|a, b| {
        let rank = |e: &Entity| e.metrics.get(field).unwrap_or(0.0);
        rank(b).total_cmp(&rank(a))
    });
}
