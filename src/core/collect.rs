//! Turns an [`OutputSet`] into exportable items and checks that every
//! derived variable name has exactly one origin.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::loader::{type_name, OutputSet};
use crate::normalize::normalize;

/// Derived name to the `group.key` it came from.
pub type NameMapping = BTreeMap<String, String>;

/// Derived name to every `group.key` that produced it, in input order.
pub type CollisionSet = BTreeMap<String, Vec<String>>;

/// One accepted scalar output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub group: String,
    pub key: String,
    pub derived_name: String,
    /// Original scalar; stringified when rendered.
    pub value: Value,
}

impl ExportItem {
    pub fn origin(&self) -> String {
        origin(&self.group, &self.key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub items: Vec<ExportItem>,
    pub mapping: NameMapping,
}

fn origin(group: &str, key: &str) -> String {
    format!("{}.{}", group, key)
}

/// Walk every `(group, key, value)` triple.
///
/// Non-object groups and object/array values are skipped with a warning.
/// All collisions are gathered before failing, so one run reports every
/// clash, each as an error record listing its origins.
pub fn collect(outputs: &OutputSet, diagnostics: &mut Diagnostics) -> Result<Collection> {
    let mut collection = Collection::default();
    let mut collisions = CollisionSet::new();

    for (group, entries) in outputs {
        let entries = match entries {
            Value::Object(entries) => entries,
            other => {
                diagnostics.warn(
                    group.clone(),
                    format!(
                        "Skipping group '{}': expected an object of outputs, found {}",
                        group,
                        type_name(other)
                    ),
                );
                continue;
            }
        };

        for (key, value) in entries {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                diagnostics.warn(
                    origin(group, key),
                    format!(
                        "Skipping {}: {} values cannot be exported",
                        origin(group, key),
                        type_name(value)
                    ),
                );
                continue;
            }

            let derived_name = normalize(group, key)?;
            let item_origin = origin(group, key);

            if let Some(first) = collection.mapping.get(&derived_name) {
                collisions
                    .entry(derived_name)
                    .or_insert_with(|| vec![first.clone()])
                    .push(item_origin);
                continue;
            }

            diagnostics.debug(format!("{} -> {}", item_origin, derived_name));
            collection
                .mapping
                .insert(derived_name.clone(), item_origin);
            collection.items.push(ExportItem {
                group: group.clone(),
                key: key.clone(),
                derived_name,
                value: value.clone(),
            });
        }
    }

    if !collisions.is_empty() {
        for (name, origins) in &collisions {
            diagnostics.error(
                name.clone(),
                format!("{} is produced by: {}", name, origins.join(", ")),
            );
        }
        return Err(Error::name_collision(collisions));
    }

    Ok(collection)
}
