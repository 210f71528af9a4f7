use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Wire-level property names that never take part in an entry's content.
pub const RESERVED_PROPERTIES: [&str; 4] = ["h", "access_token", "action", "url"];

/// Property names used internally that must never reach wire output.
pub const INTERNAL_PROPERTIES: [&str; 1] = ["post-type"];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_PROPERTIES.contains(&key)
}

pub fn is_internal(key: &str) -> bool {
    INTERNAL_PROPERTIES.contains(&key)
}

/// A single Jf2 property value.
///
/// Scalar lists and lists of nested objects are both `List`s; lists may nest
/// because the update engine appends an existing list as one element.
///
/// Deserializing goes through [`Value::from_json`], so numbers and booleans
/// read as text wherever a value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    List(Vec<Value>),
    Object(Jf2),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Jf2> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Builds a value from decoded list elements, collapsing a single
    /// element to the element itself.
    pub fn from_values(mut values: Vec<Value>) -> Value {
        if values.len() == 1 {
            values.remove(0)
        } else {
            Value::List(values)
        }
    }

    /// Collapses single-element lists to their element, recursing into
    /// nested objects.
    ///
    /// Example: `["foo"]` => `"foo"`
    pub fn collapsed(self) -> Value {
        match self {
            Value::List(mut items) if items.len() == 1 => items.remove(0).collapsed(),
            Value::Object(object) => Value::Object(object.collapsed()),
            other => other,
        }
    }

    /// Converts an arbitrary JSON value, rendering numbers and booleans as
    /// text.
    pub fn from_json(value: &serde_json::Value) -> Result<Value> {
        match value {
            serde_json::Value::String(text) => Ok(Value::Text(text.clone())),
            serde_json::Value::Number(number) => Ok(Value::Text(number.to_string())),
            serde_json::Value::Bool(flag) => Ok(Value::Text(flag.to_string())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            serde_json::Value::Object(object) => {
                let mut nested = Jf2::new();
                for (key, value) in object {
                    nested.insert(key.clone(), Value::from_json(value)?);
                }
                Ok(Value::Object(nested))
            }
            serde_json::Value::Null => Err(Error::invalid("null property values are not supported")),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::from_json(&json).map_err(serde::de::Error::custom)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Jf2> for Value {
    fn from(object: Jf2) -> Self {
        Value::Object(object)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// A Jf2 object: the flattened representation of a microformats2 entry.
///
/// Top-level entries carry an unprefixed `type` (e.g. `"entry"`); plain nested
/// objects such as `content` do not. Keys are kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jf2(BTreeMap<String, Value>);

impl Jf2 {
    pub fn new() -> Self {
        Jf2(BTreeMap::new())
    }

    /// Creates an object holding only its `type`.
    pub fn entry(entry_type: impl Into<String>) -> Self {
        let mut jf2 = Jf2::new();
        jf2.insert("type", Value::Text(entry_type.into()));
        jf2
    }

    /// Chaining variant of [`Jf2::insert`], handy for building fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn entry_type(&self) -> Option<&str> {
        self.get_text("type")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn retain(&mut self, keep: impl FnMut(&String, &mut Value) -> bool) {
        self.0.retain(keep)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collapses every single-element list value, recursing into nested
    /// objects.
    pub fn collapsed(self) -> Jf2 {
        self.into_iter()
            .map(|(key, value)| (key, value.collapsed()))
            .collect()
    }
}

impl FromIterator<(String, Value)> for Jf2 {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Jf2(iter.into_iter().collect())
    }
}

impl IntoIterator for Jf2 {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Jf2 {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reserved_and_internal_properties() {
        for key in ["h", "access_token", "action", "url"] {
            assert!(is_reserved(key));
        }
        assert!(!is_reserved("content"));
        assert!(is_internal("post-type"));
        assert!(!is_internal("type"));
    }

    #[test]
    fn test_collapsed_unwraps_single_element_lists() {
        let value = Value::List(vec![Value::from("foo")]);
        assert_eq!(value.collapsed(), Value::from("foo"));
    }

    #[test]
    fn test_collapsed_keeps_multi_element_lists() {
        let value = Value::List(vec![Value::from("foo"), Value::from("bar")]);
        assert_eq!(value.clone().collapsed(), value);
    }

    #[test]
    fn test_collapsed_recurses_into_objects() {
        let object = Jf2::new().with("html", Value::List(vec![Value::from("<p>hi</p>")]));
        let collapsed = Value::Object(object).collapsed();
        assert_eq!(
            collapsed,
            Value::Object(Jf2::new().with("html", "<p>hi</p>"))
        );
    }

    #[test]
    fn test_from_values_collapses_singletons() {
        assert_eq!(Value::from_values(vec![Value::from("a")]), Value::from("a"));
        assert_eq!(
            Value::from_values(vec![Value::from("a"), Value::from("b")]),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_from_json_renders_numbers_and_booleans_as_text() {
        let value = Value::from_json(&json!([1, 2.5, true])).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::from("1"),
                Value::from("2.5"),
                Value::from("true")
            ])
        );
    }

    #[test]
    fn test_from_json_rejects_null() {
        let err = Value::from_json(&json!(null)).unwrap_err();
        assert!(err.is_invalid_post());
    }

    #[test]
    fn test_jf2_deserializes_untagged_values() {
        let jf2: Jf2 = serde_json::from_value(json!({
            "type": "entry",
            "category": ["foo", "bar"],
            "content": {"html": "<b>hi</b>", "text": "hi"}
        }))
        .unwrap();

        assert_eq!(jf2.entry_type(), Some("entry"));
        assert_eq!(jf2.get("category").and_then(Value::as_list).map(<[Value]>::len), Some(2));
        assert_eq!(
            jf2.get("content")
                .and_then(Value::as_object)
                .and_then(|content| content.get_text("text")),
            Some("hi")
        );
    }

    #[test]
    fn test_deserialize_reads_numbers_and_booleans_as_text() {
        let jf2: Jf2 = serde_json::from_value(json!({
            "type": "entry",
            "latitude": 52.5,
            "rating": [4, true]
        }))
        .unwrap();

        assert_eq!(jf2.get_text("latitude"), Some("52.5"));
        assert_eq!(
            jf2.get("rating"),
            Some(&Value::List(vec![Value::from("4"), Value::from("true")]))
        );
        assert!(serde_json::from_value::<Value>(json!(null)).is_err());
    }

    #[test]
    fn test_jf2_serializes_flat() {
        let jf2 = Jf2::entry("entry").with("content", "Hello World");
        assert_eq!(
            serde_json::to_value(&jf2).unwrap(),
            json!({"type": "entry", "content": "Hello World"})
        );
    }
}
