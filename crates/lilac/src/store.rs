//! Posts persisted as JSON files, keyed by URL.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use lilac_core::micropub::{MemoryStore, PostStore};
use lilac_core::post::Post;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::prelude::StoreError;

pub const POST_PROPERTIES_FILE: &str = "post_properties.json";
pub const DELETED_POSTS_FILE: &str = "deleted_posts.json";

/// A [`PostStore`] loaded from `<dir>/post_properties.json`, with the URLs of
/// deleted posts kept in `<dir>/deleted_posts.json`.
///
/// Changes stay in memory until [`FileStore::save`] rewrites the files.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    posts: MemoryStore,
}

impl FileStore {
    /// Opens the store in `dir`, creating the directory and empty store files
    /// when they do not exist yet.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let posts: BTreeMap<String, Post> = load(&dir.join(POST_PROPERTIES_FILE), "{}")?;
        let deleted: BTreeSet<String> = load(&dir.join(DELETED_POSTS_FILE), "[]")?;
        debug!(
            "loaded {} posts and {} deleted urls from {}",
            posts.len(),
            deleted.len(),
            dir.display()
        );

        Ok(FileStore {
            dir: dir.to_path_buf(),
            posts: MemoryStore::from_posts(posts).with_deleted(deleted),
        })
    }

    /// Rewrites the store files with the current posts.
    ///
    /// Each file is written to a temporary sibling first and renamed over
    /// the old one.
    pub fn save(&self) -> Result<(), StoreError> {
        dump(&self.dir, POST_PROPERTIES_FILE, self.posts.posts())?;
        dump(&self.dir, DELETED_POSTS_FILE, self.posts.deleted())?;
        debug!("saved {} posts to {}", self.posts.len(), self.dir.display());
        Ok(())
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(POST_PROPERTIES_FILE)
    }

    pub fn posts(&self) -> &BTreeMap<String, Post> {
        self.posts.posts()
    }
}

fn load<T: DeserializeOwned>(path: &Path, empty: &str) -> Result<T, StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        fs::write(path, empty).map_err(io_error)?;
        info!("created empty store file at {}", path.display());
    }

    let raw = fs::read_to_string(path).map_err(io_error)?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn dump<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<(), StoreError> {
    let path = dir.join(file);
    let io_error = |source| StoreError::Io {
        path: path.clone(),
        source,
    };

    let raw = serde_json::to_string_pretty(value).map_err(StoreError::Serialize)?;
    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(raw.as_bytes()).map_err(io_error)?;
    temp.persist(&path).map_err(|e| io_error(e.error))?;
    Ok(())
}

impl PostStore for FileStore {
    fn get(&self, url: &str) -> Option<Post> {
        self.posts.get(url)
    }

    fn put(&mut self, url: String, post: Post) {
        self.posts.put(url, post)
    }

    fn remove(&mut self, url: &str) -> Option<Post> {
        self.posts.remove(url)
    }

    fn urls(&self) -> Vec<String> {
        self.posts.urls()
    }

    fn taken_urls(&self) -> Vec<String> {
        self.posts.taken_urls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lilac_core::microformats::Jf2;

    fn post(content: &str) -> Post {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Post::from_jf2(
            Jf2::entry("entry")
                .with("content", content)
                .with("location", "geo:52.52,13.40"),
            now,
        )
        .unwrap()
    }

    #[test]
    fn test_open_creates_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join(".lilac");

        let store = FileStore::open(&store_dir).unwrap();

        assert!(store.posts().is_empty());
        assert_eq!(
            fs::read_to_string(store_dir.join(POST_PROPERTIES_FILE)).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.put("https://example.com/note/2024/03/01/01".to_string(), post("hi"));
        store.save().unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();

        assert_eq!(
            reopened.get("https://example.com/note/2024/03/01/01"),
            Some(post("hi"))
        );
        assert_eq!(reopened.urls().len(), 1);
    }

    #[test]
    fn test_unsaved_changes_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.put("https://example.com/1".to_string(), post("hi"));

        assert!(FileStore::open(dir.path()).unwrap().posts().is_empty());
    }

    #[test]
    fn test_corrupt_store_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(POST_PROPERTIES_FILE), "[1, 2").unwrap();

        let err = FileStore::open(dir.path()).unwrap_err();

        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn test_deleted_urls_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://example.com/note/2024/03/01/01".to_string();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.put(url.clone(), post("hi"));
        store.remove(&url);
        store.save().unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();

        assert!(reopened.urls().is_empty());
        assert_eq!(reopened.taken_urls(), vec![url]);
    }

    #[test]
    fn test_save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.put("https://example.com/1".to_string(), post("hi"));
        store.save().unwrap();
        store.save().unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec![DELETED_POSTS_FILE, POST_PROPERTIES_FILE]);
    }
}
