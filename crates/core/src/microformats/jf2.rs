//! Decoding of incoming Micropub bodies into Jf2.
//!
//! See: <https://microformats.org/wiki/jf2>

use std::collections::BTreeMap;

use log::debug;
use serde_json::Value as JsonValue;

use super::value::{is_reserved, Jf2, Value};
use crate::error::{Error, Result};

/// Form fields as an ordered multi-map: field name to every submitted value.
pub type FormValues = BTreeMap<String, Vec<String>>;

/// Strips the `h-` vocabulary prefix: `"h-entry"` => `"entry"`.
pub fn strip_type_prefix(entry_type: &str) -> &str {
    entry_type.strip_prefix("h-").unwrap_or(entry_type)
}

/// Converts a JSON microformats2 entry to Jf2.
///
/// The first `type` is kept, unprefixed. Reserved and empty properties are
/// skipped, single-element property lists collapse to their element.
pub fn decode_json(raw: &JsonValue) -> Result<Jf2> {
    let entry = raw
        .as_object()
        .ok_or_else(|| Error::invalid("invalid entry: expected a JSON object"))?;

    let entry_type = entry
        .get("type")
        .and_then(JsonValue::as_array)
        .and_then(|types| types.first())
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::invalid("invalid entry: entry does not have a valid type"))?;

    let properties = entry
        .get("properties")
        .and_then(JsonValue::as_object)
        .ok_or_else(|| Error::invalid("invalid entry: invalid properties field"))?;

    let mut jf2 = Jf2::new();
    for (key, value) in properties {
        if is_reserved(key) {
            debug!("skipping reserved property '{key}'");
            continue;
        }

        let values = value.as_array().ok_or_else(|| {
            Error::invalid(format!(
                "invalid entry: property '{key}' is not wrapped in an array"
            ))
        })?;

        match decode_property(values)? {
            Some(decoded) => {
                jf2.insert(key.clone(), decoded);
            }
            None => debug!("skipping empty property '{key}'"),
        }
    }

    // The entry's own type wins over a stray `type` property.
    jf2.insert("type", strip_type_prefix(entry_type));

    Ok(jf2)
}

/// Decodes one property's value list, or `None` when the list is empty.
///
/// The shape of the first element decides how the list is read: objects are
/// decoded as nested entries or plain nested objects, anything else is kept
/// as scalars.
fn decode_property(values: &[JsonValue]) -> Result<Option<Value>> {
    let Some(first) = values.first() else {
        return Ok(None);
    };

    let decoded = if first.is_object() {
        values
            .iter()
            .map(decode_nested)
            .collect::<Result<Vec<_>>>()?
    } else {
        values
            .iter()
            .map(Value::from_json)
            .collect::<Result<Vec<_>>>()?
    };

    Ok(Some(Value::from_values(decoded)))
}

fn decode_nested(value: &JsonValue) -> Result<Value> {
    match value.as_object() {
        // A full microformat, e.g. the h-card of a checkin.
        Some(object) if object.contains_key("properties") => decode_json(value).map(Value::Object),
        Some(_) => Value::from_json(value).map(Value::collapsed),
        None => Value::from_json(value),
    }
}

/// Merges `key[]` fields into `key`, keeping submission order.
pub fn collapse_array_keys<I, K, V>(fields: I) -> FormValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut form = FormValues::new();
    for (key, value) in fields {
        let key: String = key.into();
        let key = match key.strip_suffix("[]") {
            Some(stripped) => stripped.to_string(),
            None => key,
        };
        form.entry(key).or_default().push(value.into());
    }
    form
}

/// Converts form-encoded fields to Jf2.
///
/// `h` becomes `type`, reserved fields are dropped, single values collapse to
/// a scalar and repeated values stay an ordered list.
pub fn decode_form(form: &FormValues) -> Jf2 {
    let mut jf2 = Jf2::new();
    for (key, values) in form {
        let key = match key.as_str() {
            "h" => "type",
            key if is_reserved(key) => continue,
            key => key,
        };

        let value = match values.as_slice() {
            [] => continue,
            [single] => Value::Text(single.clone()),
            many => Value::List(many.iter().cloned().map(Value::Text).collect()),
        };
        jf2.insert(key, value);
    }
    jf2
}
