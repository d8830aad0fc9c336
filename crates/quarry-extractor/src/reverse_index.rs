//! Reverse-index builder
//!
//! Runs after every category snapshot exists. Computes reverse relationship
//! fields as a separate patch set from immutable snapshots, then applies the
//! patches in one step.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::types::CategorySnapshot;
use indexmap::IndexMap;
use quarry_domain::{Cardinality, ReverseIndexSpec};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Reverse fields to add: category -> entity id -> field -> source ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReversePatches {
    patches: BTreeMap<String, BTreeMap<String, IndexMap<String, Vec<String>>>>,
}

impl ReversePatches {
    fn add(&mut self, category: &str, target: &str, field: &str, source_id: &str) {
        let ids = self
            .patches
            .entry(category.to_string())
            .or_default()
            .entry(target.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default();
        if !ids.iter().any(|id| id == source_id) {
            ids.push(source_id.to_string());
        }
    }

    /// Source ids patched onto one entity field
    pub fn get(&self, category: &str, target: &str, field: &str) -> Option<&[String]> {
        self.patches
            .get(category)?
            .get(target)?
            .get(field)
            .map(Vec::as_slice)
    }

    /// Whether there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Number of patched entity fields
    pub fn len(&self) -> usize {
        self.patches
            .values()
            .flat_map(|entities| entities.values())
            .map(IndexMap::len)
            .sum()
    }
}

/// Compute reverse fields for every relationship declaration
///
/// Source entities are visited in identifier order, so reverse lists come
/// out sorted by source id. References to entities that are not in the
/// target snapshot are dropped silently.
pub fn build_reverse_indexes(
    snapshots: &[CategorySnapshot],
    specs: &[ReverseIndexSpec],
    diagnostics: &mut Diagnostics,
) -> ReversePatches {
    let by_name: HashMap<&str, &CategorySnapshot> =
        snapshots.iter().map(|s| (s.name.as_str(), s)).collect();
    let mut patches = ReversePatches::default();

    for spec in specs {
        let (Some(source), Some(target)) = (
            by_name.get(spec.source_category.as_str()),
            by_name.get(spec.target_category.as_str()),
        ) else {
            debug!(
                "Skipping reverse index '{}': {} or {} was not built",
                spec.reverse_field, spec.source_category, spec.target_category
            );
            continue;
        };

        let mut source_ids: Vec<&String> = source.entries.keys().collect();
        source_ids.sort();

        for source_id in source_ids {
            let Some(value) = source.entries[source_id].get(&spec.source_field) else {
                continue;
            };
            for target_id in forward_ids(value, spec.cardinality) {
                let Some(target_entity) = target.entries.get(target_id) else {
                    continue;
                };
                let first_patch = patches
                    .get(&spec.target_category, target_id, &spec.reverse_field)
                    .is_none();
                if first_patch && target_entity.get(&spec.reverse_field).is_some() {
                    diagnostics.record(
                        Diagnostic::new(
                            DiagnosticKind::ReverseFieldCollision,
                            "existing field replaced by reverse index",
                        )
                        .category(spec.target_category.clone())
                        .entity(target_id)
                        .field(spec.reverse_field.clone()),
                    );
                }
                patches.add(&spec.target_category, target_id, &spec.reverse_field, source_id);
            }
        }
    }

    patches
}

fn forward_ids(value: &Value, cardinality: Cardinality) -> Vec<&str> {
    match (cardinality, value) {
        (_, Value::String(id)) => vec![id.as_str()],
        (Cardinality::Multi, Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        (Cardinality::Multi, Value::Object(map)) => map.keys().map(String::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Apply patches, consuming the snapshots
pub fn apply_patches(
    snapshots: Vec<CategorySnapshot>,
    mut patches: ReversePatches,
) -> Vec<CategorySnapshot> {
    snapshots
        .into_iter()
        .map(|mut snapshot| {
            if let Some(entities) = patches.patches.remove(&snapshot.name) {
                for (id, fields) in entities {
                    if let Some(entity) = snapshot.entries.get_mut(&id) {
                        for (field, ids) in fields {
                            entity.insert(field, Value::Array(ids.into_iter().map(Value::String).collect()));
                        }
                    }
                }
            }
            snapshot
        })
        .collect()
}
