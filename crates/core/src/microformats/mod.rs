//! Jf2 and microformats2 representations of an entry, and the conversions
//! and partial updates between them.

pub mod jf2;
pub mod mf2;
pub mod update;
pub mod value;

pub use jf2::{collapse_array_keys, decode_form, decode_json, FormValues};
pub use mf2::{encode, Mf2, PropertyValue};
pub use update::{DeleteSpec, UpdateSpec};
pub use value::{Jf2, Value, RESERVED_PROPERTIES};
