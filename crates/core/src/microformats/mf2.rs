use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::{is_internal, is_reserved, Jf2, Value};
use crate::error::{Error, Result};

/// A microformats2 entry in its wire form.
///
/// Every property value is wrapped in a list, singletons included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mf2 {
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
}

/// One element of an Mf2 property list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A nested microformat, e.g. the h-card of a checkin.
    Entry(Mf2),
    Value(Value),
}

impl Mf2 {
    pub fn entry_type(&self) -> Option<&str> {
        self.kind.first().map(String::as_str)
    }
}

/// Converts a Jf2 entry back to microformats2.
///
/// Nested objects with their own `type` become child entries; other nested
/// objects get each sub-value wrapped. Each element of a list is encoded the
/// same way and scalars are wrapped in a one-element list. `type`, reserved and internal
/// properties are never emitted.
pub fn encode(jf2: &Jf2) -> Result<Mf2> {
    let entry_type = jf2
        .entry_type()
        .ok_or_else(|| Error::invalid("entry does not have a type"))?;

    let mut properties = BTreeMap::new();
    for (key, value) in jf2 {
        if key == "type" || is_reserved(key) || is_internal(key) {
            continue;
        }

        let encoded = match value {
            // Empty lists are not valid mf2 and would not survive decoding.
            Value::List(items) if items.is_empty() => continue,
            Value::List(items) => items.iter().map(encode_element).collect::<Result<_>>()?,
            single => vec![encode_element(single)?],
        };
        properties.insert(key.clone(), encoded);
    }

    Ok(Mf2 {
        kind: vec![format!("h-{entry_type}")],
        properties,
    })
}

/// Encodes one element of a property list.
fn encode_element(value: &Value) -> Result<PropertyValue> {
    Ok(match value {
        Value::Object(object) if object.contains_key("type") => PropertyValue::Entry(encode(object)?),
        Value::Object(object) => PropertyValue::Value(Value::Object(wrap_values(object))),
        other => PropertyValue::Value(other.clone()),
    })
}

fn wrap_values(object: &Jf2) -> Jf2 {
    object
        .iter()
        .map(|(key, value)| {
            let wrapped = match value {
                Value::List(_) => value.clone(),
                other => Value::List(vec![other.clone()]),
            };
            (key.clone(), wrapped)
        })
        .collect()
}
