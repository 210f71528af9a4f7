use log::debug;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::microformats::{decode_form, decode_json, FormValues, Jf2, UpdateSpec};

/// A parsed Micropub POST body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MicropubRequest {
    Create(Jf2),
    Update { url: String, spec: UpdateSpec },
    Delete { url: String },
}

impl MicropubRequest {
    /// Classifies a JSON body: `action` + `url` is an action, a `type` is a
    /// new entry.
    pub fn from_json(body: &JsonValue) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| Error::invalid("request body must be a JSON object"))?;

        if let (Some(action), Some(url)) = (object.get("action"), object.get("url")) {
            let action = action
                .as_str()
                .ok_or_else(|| Error::invalid("action must be a string"))?;
            let url = url
                .as_str()
                .ok_or_else(|| Error::invalid("url must be a string"))?
                .to_string();
            debug!("micropub action '{action}' for {url}");

            return match action {
                "update" => Ok(MicropubRequest::Update {
                    url,
                    spec: UpdateSpec::from_json(body)?,
                }),
                "delete" => Ok(MicropubRequest::Delete { url }),
                other => Err(Error::invalid(format!("unknown action '{other}'"))),
            };
        }

        if object.contains_key("type") {
            return decode_json(body).map(MicropubRequest::Create);
        }

        Err(Error::invalid("request is neither a new entry nor an action"))
    }

    /// Classifies a form body: `h` is a new entry, `action` + `url` a delete.
    ///
    /// Updates cannot be form-encoded.
    pub fn from_form(form: &FormValues) -> Result<Self> {
        let single = |key: &str| form.get(key).and_then(|values| values.first());

        if let (Some(action), Some(url)) = (single("action"), single("url")) {
            debug!("micropub action '{action}' for {url}");
            return match action.as_str() {
                "delete" => Ok(MicropubRequest::Delete { url: url.clone() }),
                "update" => Err(Error::invalid("update requests must be sent as JSON")),
                other => Err(Error::invalid(format!("unknown action '{other}'"))),
            };
        }

        if form.contains_key("h") {
            return Ok(MicropubRequest::Create(decode_form(form)));
        }

        Err(Error::invalid("request is neither a new entry nor an action"))
    }
}
