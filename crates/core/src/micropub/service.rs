use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, info};

use super::query::{ConfigResponse, SourceResponse};
use super::request::MicropubRequest;
use super::store::PostStore;
use crate::error::{Error, Result};
use crate::microformats::{Jf2, UpdateSpec};
use crate::post::{Post, PostType};

/// Settings the service needs from its host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL of the site, e.g. `https://example.com`.
    pub me: String,
    pub media_endpoint: Option<String>,
}

/// What a handled request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(String),
    Updated(String),
    Deleted(String),
}

/// Micropub operations over a [`PostStore`].
///
/// A failed operation leaves the store untouched.
pub struct Micropub<S> {
    config: ServiceConfig,
    store: S,
}

impl<S: PostStore> Micropub<S> {
    pub fn new(config: ServiceConfig, store: S) -> Self {
        Micropub { config, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn handle(&mut self, request: MicropubRequest, now: DateTime<Utc>) -> Result<Outcome> {
        match request {
            MicropubRequest::Create(jf2) => self.create(jf2, now).map(Outcome::Created),
            MicropubRequest::Update { url, spec } => {
                self.update(&url, &spec, now)?;
                Ok(Outcome::Updated(url))
            }
            MicropubRequest::Delete { url } => {
                self.delete(&url)?;
                Ok(Outcome::Deleted(url))
            }
        }
    }

    /// Builds a post from the entry, stores it under a fresh URL and returns
    /// that URL.
    pub fn create(&mut self, jf2: Jf2, now: DateTime<Utc>) -> Result<String> {
        let post = Post::from_jf2(jf2, now)?;
        let url = mint_url(
            &self.config.me,
            post.post_type,
            post.published,
            post.slug.as_deref(),
            &self.store.taken_urls(),
        );
        info!("created {} at {url}", post.post_type);
        self.store.put(url.clone(), post);
        Ok(url)
    }

    /// Applies an update to a stored post and rebuilds it, stamping
    /// `updated` with `now`.
    pub fn update(&mut self, url: &str, spec: &UpdateSpec, now: DateTime<Utc>) -> Result<()> {
        let current = self.find(url)?;

        let mut jf2 = spec.apply(&current.to_jf2());
        jf2.insert("updated", now.to_rfc3339());
        let post = Post::from_jf2(jf2, now)?;

        info!("updated {url}");
        self.store.put(url.to_string(), post);
        Ok(())
    }

    pub fn delete(&mut self, url: &str) -> Result<()> {
        self.store.remove(url).ok_or_else(|| {
            debug!("delete of unknown post {url}");
            Error::not_found(url)
        })?;
        info!("deleted {url}");
        Ok(())
    }

    /// Answers `q=source` for a stored post.
    pub fn source(&self, url: &str, properties: &[String]) -> Result<SourceResponse> {
        let post = self.find(url)?;
        SourceResponse::new(post.to_jf2(), properties)
    }

    /// Answers `q=config`.
    pub fn config(&self) -> ConfigResponse {
        ConfigResponse {
            media_endpoint: self.config.media_endpoint.clone(),
        }
    }

    fn find(&self, url: &str) -> Result<Post> {
        self.store.get(url).ok_or_else(|| {
            debug!("no post stored at {url}");
            Error::not_found(url)
        })
    }
}

/// Mints `<me>/<post-type>/<YYYY>/<MM>/<DD>/<suffix>` from the published date.
///
/// The suffix is the post's slug when it has one that is not taken yet.
/// Otherwise it is a two-digit sequence, one more than the highest sequence
/// already taken under the same prefix. `taken` includes deleted posts, so
/// their URLs are never reissued.
pub fn mint_url(
    me: &str,
    post_type: PostType,
    published: DateTime<FixedOffset>,
    slug: Option<&str>,
    taken: &[String],
) -> String {
    let prefix = format!(
        "{}/{}/{}/",
        me.trim_end_matches('/'),
        post_type,
        published.format("%Y/%m/%d")
    );

    if let Some(slug) = slug.filter(|slug| !slug.is_empty() && !slug.contains('/')) {
        let url = format!("{prefix}{slug}");
        if !taken.contains(&url) {
            return url;
        }
        debug!("slug '{slug}' is taken, falling back to a sequence number");
    }

    let highest = taken
        .iter()
        .filter_map(|url| url.strip_prefix(&prefix))
        .filter_map(|sequence| sequence.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{prefix}{:02}", highest.saturating_add(1))
}
