//! Reading request bodies from disk or stdin.

use std::io::Read;
use std::path::Path;

use crate::prelude::*;
use lilac_core::microformats::{collapse_array_keys, FormValues};
use url::form_urlencoded;

/// Reads a body from `file`, or from stdin when no file (or `-`) is given.
pub fn read_body(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .wrap_err_with(|| f!("Failed to read {}", path.display())),
        _ => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .wrap_err("Failed to read stdin")?;
            Ok(body)
        }
    }
}

pub fn parse_json(body: &str) -> Result<serde_json::Value> {
    serde_json::from_str(body).wrap_err("Request body is not valid JSON")
}

/// Splits an `application/x-www-form-urlencoded` body into its fields, in
/// order. Invalid UTF-8 is replaced rather than rejected.
pub fn parse_urlencoded(body: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

/// Parses a form body and merges `key[]` fields.
pub fn parse_form(body: &str) -> FormValues {
    collapse_array_keys(parse_urlencoded(body.trim()))
}
