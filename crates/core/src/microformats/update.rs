//! Partial updates of an existing entry.
//!
//! See: <https://www.w3.org/TR/micropub/#update>

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::value::{Jf2, Value};
use crate::error::{Error, Result};

/// The `add` / `replace` / `delete` members of an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<DeleteSpec>,
}

/// What to delete: whole properties, or individual values of properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeleteSpec {
    Properties(Vec<String>),
    Values(BTreeMap<String, Value>),
}

impl UpdateSpec {
    /// Reads the update members out of a full update request body. Other
    /// members (`action`, `url`, ...) are ignored.
    pub fn from_json(body: &serde_json::Value) -> Result<Self> {
        let mut members = serde_json::Map::new();
        for member in ["add", "replace", "delete"] {
            if let Some(value) = body.get(member) {
                members.insert(member.to_string(), value.clone());
            }
        }
        serde_json::from_value(serde_json::Value::Object(members))
            .map_err(|e| Error::invalid(format!("invalid update request: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_none() && self.replace.is_none() && self.delete.is_none()
    }

    /// Applies add, then replace, then delete, returning the updated entry.
    pub fn apply(&self, jf2: &Jf2) -> Jf2 {
        let mut updated = jf2.clone();
        if let Some(add) = &self.add {
            apply_add(&mut updated, add);
        }
        if let Some(replace) = &self.replace {
            apply_replace(&mut updated, replace);
        }
        if let Some(delete) = &self.delete {
            apply_delete(&mut updated, delete);
        }
        updated
    }
}

/// Adds values to properties.
///
/// Only list values are considered. A new property takes the values,
/// collapsed when there is just one. An existing property becomes the new
/// values followed by the existing value as the last element, so adding to a
/// list nests the old list inside the new one.
pub fn apply_add(target: &mut Jf2, spec: &BTreeMap<String, Value>) {
    for (key, value) in spec {
        let Value::List(new_values) = value else {
            debug!("ignoring add for '{key}': value is not a list");
            continue;
        };

        let added = match target.remove(key) {
            Some(existing) => {
                let mut merged = new_values.clone();
                merged.push(existing);
                Value::List(merged)
            }
            None => Value::from_values(new_values.clone()),
        };
        target.insert(key.clone(), added);
    }
}

/// Replaces properties that already exist; absent properties are left alone.
pub fn apply_replace(target: &mut Jf2, spec: &BTreeMap<String, Value>) {
    for (key, value) in spec {
        if !target.contains_key(key) {
            debug!("ignoring replace for absent property '{key}'");
            continue;
        }
        target.insert(key.clone(), value.clone().collapsed());
    }
}

/// Removes whole properties, or specific values from properties.
///
/// Removing values keeps every element not named for removal, so adjacent
/// duplicates all go. A property whose last value is removed is left as an
/// empty list. A scalar property behaves as a one-element list.
pub fn apply_delete(target: &mut Jf2, spec: &DeleteSpec) {
    match spec {
        DeleteSpec::Properties(keys) => target.retain(|key, _| !keys.contains(key)),
        DeleteSpec::Values(values) => {
            for (key, to_remove) in values {
                let Some(existing) = target.get(key) else {
                    continue;
                };

                let to_remove: Vec<&Value> = match to_remove {
                    Value::List(items) => items.iter().collect(),
                    single => vec![single],
                };

                let remaining: Vec<Value> = match existing {
                    Value::List(items) => items
                        .iter()
                        .filter(|item| !to_remove.contains(item))
                        .cloned()
                        .collect(),
                    single if to_remove.contains(&single) => Vec::new(),
                    _ => continue,
                };
                target.insert(key.clone(), Value::List(remaining));
            }
        }
    }
}
