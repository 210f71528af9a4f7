//! The strongly typed post and the pipeline that builds it from Jf2.
//!
//! Creation runs decode → [`normalize`] → [`classify`] → [`bind`]. Updates
//! reverse-serialize the stored post with [`Post::to_jf2`], apply the update
//! and rebuild through the same pipeline. A `Post` is never mutated in place.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::microformats::Jf2;

pub mod bind;
pub mod classify;
pub mod fields;
pub mod normalize;
pub mod serialize;

pub use bind::bind;
pub use classify::classify;
pub use fields::Field;
pub use normalize::normalize;

/// Post kinds, derived from the properties an entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Note,
    Article,
    Like,
    Reply,
    Repost,
    Bookmark,
    Checkin,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Note => "note",
            PostType::Article => "article",
            PostType::Like => "like",
            PostType::Reply => "reply",
            PostType::Repost => "repost",
            PostType::Bookmark => "bookmark",
            PostType::Checkin => "checkin",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post, as stored and rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "post-type")]
    pub post_type: PostType,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub published: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<Photo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin: Option<Checkin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    #[serde(rename = "like-of", default, skip_serializing_if = "Option::is_none")]
    pub like_of: Option<String>,
    #[serde(rename = "repost-of", default, skip_serializing_if = "Option::is_none")]
    pub repost_of: Option<String>,
    #[serde(rename = "bookmark-of", default, skip_serializing_if = "Option::is_none")]
    pub bookmark_of: Option<String>,
    #[serde(rename = "in-reply-to", default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(rename = "mp-slug", default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub value: String,
    pub alt: String,
}

/// An incomplete h-card, used by checkin posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkin {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<String>,
}

impl Post {
    /// Builds a post from decoded Jf2: normalizes, classifies, then binds.
    ///
    /// `now` is the default for a missing `published`.
    pub fn from_jf2(jf2: Jf2, now: DateTime<Utc>) -> Result<Post> {
        let normalized = normalize(jf2, now)?;
        let post_type = classify(&normalized);
        debug!("classified entry as {post_type}");
        bind(&normalized, post_type)
    }
}
