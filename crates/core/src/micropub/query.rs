use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::microformats::{encode, Jf2, Mf2, PropertyValue};

/// Keeps only the named properties, plus `type` which encoding needs.
pub fn filter_properties(mut jf2: Jf2, properties: &[String]) -> Jf2 {
    jf2.retain(|key, _| key == "type" || properties.contains(key));
    jf2
}

/// Response to `q=source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SourceResponse {
    /// The full entry, when no properties were asked for.
    Entry(Mf2),
    /// Only the requested properties.
    Properties {
        properties: BTreeMap<String, Vec<PropertyValue>>,
    },
}

impl SourceResponse {
    /// Encodes an entry, narrowed to `properties` when any are given.
    pub fn new(jf2: Jf2, properties: &[String]) -> Result<Self> {
        if properties.is_empty() {
            return encode(&jf2).map(SourceResponse::Entry);
        }

        let mf2 = encode(&filter_properties(jf2, properties))?;
        Ok(SourceResponse::Properties {
            properties: mf2.properties,
        })
    }
}

/// Response to `q=config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigResponse {
    #[serde(rename = "media-endpoint", skip_serializing_if = "Option::is_none")]
    pub media_endpoint: Option<String>,
}
