use std::collections::{BTreeMap, BTreeSet};

use crate::post::Post;

/// Where posts live, keyed by their public URL.
///
/// Deleting a post leaves its URL behind as a tombstone, so
/// [`PostStore::taken_urls`] keeps reporting it and it is never minted again.
///
/// There is no locking around read-modify-write: when two updates for the
/// same URL race, the last `put` wins.
pub trait PostStore {
    fn get(&self, url: &str) -> Option<Post>;

    fn put(&mut self, url: String, post: Post);

    /// Removes a live post and marks its URL as deleted.
    fn remove(&mut self, url: &str) -> Option<Post>;

    /// URLs of live posts.
    fn urls(&self) -> Vec<String>;

    /// Live and deleted URLs alike.
    fn taken_urls(&self) -> Vec<String>;
}

/// A [`PostStore`] held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    posts: BTreeMap<String, Post>,
    deleted: BTreeSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_posts(posts: BTreeMap<String, Post>) -> Self {
        MemoryStore {
            posts,
            deleted: BTreeSet::new(),
        }
    }

    pub fn with_deleted(mut self, deleted: BTreeSet<String>) -> Self {
        self.deleted = deleted;
        self
    }

    pub fn posts(&self) -> &BTreeMap<String, Post> {
        &self.posts
    }

    pub fn deleted(&self) -> &BTreeSet<String> {
        &self.deleted
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl PostStore for MemoryStore {
    fn get(&self, url: &str) -> Option<Post> {
        self.posts.get(url).cloned()
    }

    fn put(&mut self, url: String, post: Post) {
        self.deleted.remove(&url);
        self.posts.insert(url, post);
    }

    fn remove(&mut self, url: &str) -> Option<Post> {
        let removed = self.posts.remove(url)?;
        self.deleted.insert(url.to_string());
        Some(removed)
    }

    fn urls(&self) -> Vec<String> {
        self.posts.keys().cloned().collect()
    }

    fn taken_urls(&self) -> Vec<String> {
        self.posts
            .keys()
            .chain(self.deleted.iter())
            .cloned()
            .collect()
    }
}
