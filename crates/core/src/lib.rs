//! Core library for lilac
//!
//! This crate implements the **Functional Core** of the lilac Micropub
//! server, following the Functional Core - Imperative Shell architectural
//! pattern.
//!
//! # Architecture Overview
//!
//! - **`lilac_core`** (this crate): entry decoding, post construction and the
//!   Micropub operations, with zero I/O
//! - **`lilac`**: reading request bodies, persisting posts and printing
//!   results (the Imperative Shell)
//!
//! The only outside state the core touches is the [`micropub::PostStore`]
//! handed to it, and the current time, which callers pass in explicitly.
//!
//! # Module Organization
//!
//! - [`microformats`]: Jf2 / mf2 value model, decoding, encoding and updates
//! - [`post`]: normalization, classification and binding of a typed [`post::Post`]
//! - [`micropub`]: request classification, post store, create / update /
//!   delete / source / config
//! - [`error`]: the error type shared by all of the above
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use lilac_core::micropub::{MemoryStore, Micropub, MicropubRequest, ServiceConfig};
//!
//! let body = serde_json::json!({"type": ["h-entry"], "properties": {"content": ["hi"]}});
//! let mut service = Micropub::new(
//!     ServiceConfig { me: "https://example.com".into(), media_endpoint: None },
//!     MemoryStore::new(),
//! );
//!
//! let outcome = service.handle(MicropubRequest::from_json(&body)?, chrono::Utc::now())?;
//! ```

pub mod error;
pub mod microformats;
pub mod micropub;
pub mod post;

pub use error::{Error, Result};
