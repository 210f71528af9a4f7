//! The Micropub service: request classification, the post store seam and
//! the create / update / delete / query operations over it.
//!
//! See: <https://www.w3.org/TR/micropub/>

pub mod query;
pub mod request;
pub mod service;
pub mod store;

pub use query::{filter_properties, ConfigResponse, SourceResponse};
pub use request::MicropubRequest;
pub use service::{mint_url, Micropub, Outcome, ServiceConfig};
pub use store::{MemoryStore, PostStore};
