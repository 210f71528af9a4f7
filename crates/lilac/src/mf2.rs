use std::path::PathBuf;

use crate::body::{parse_form, parse_json, read_body};
use crate::prelude::{println, *};
use lilac_core::microformats::{decode_form, decode_json, encode as encode_jf2, Jf2};

#[derive(Debug, clap::Args, Clone)]
pub struct DecodeOptions {
    /// Body to decode; reads stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Body is application/x-www-form-urlencoded instead of mf2 JSON
    #[arg(long)]
    form: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct EncodeOptions {
    /// Jf2 JSON to encode; reads stdin when omitted or `-`
    file: Option<PathBuf>,
}

pub fn decode(options: DecodeOptions) -> Result<()> {
    let body = read_body(options.file.as_deref())?;

    let jf2 = if options.form {
        decode_form(&parse_form(&body))
    } else {
        decode_json(&parse_json(&body)?)?
    };

    println!("{}", serde_json::to_string_pretty(&jf2)?);
    Ok(())
}

pub fn encode(options: EncodeOptions) -> Result<()> {
    let body = read_body(options.file.as_deref())?;
    let jf2: Jf2 = serde_json::from_str(&body).wrap_err("Body is not a Jf2 object")?;

    let mf2 = encode_jf2(&jf2)?;

    println!("{}", serde_json::to_string_pretty(&mf2)?);
    Ok(())
}
