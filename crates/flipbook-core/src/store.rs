//! Bookmark persistence.
//!
//! Each book gets a directory named after the SHA-256 of its key, holding a
//! tiny TOML file with the bookmarked page indices. Callers treat any
//! failure as "no bookmarks" and keep reading.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const BOOKMARKS_FILE: &str = "bookmarks.toml";

pub trait BookmarkStore: Send + Sync {
    fn load(&self, key: &str) -> Result<BTreeSet<usize>>;
    fn save(&self, key: &str, pages: &BTreeSet<usize>) -> Result<()>;
}

/// Per-book cache directory under `root`.
pub fn book_cache_dir(root: &Path, key: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    root.join(format!("{:x}", hasher.finalize()))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BookmarkFile {
    #[serde(default)]
    pages: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct FileBookmarkStore {
    root: PathBuf,
}

impl FileBookmarkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        book_cache_dir(&self.root, key).join(BOOKMARKS_FILE)
    }
}

impl BookmarkStore for FileBookmarkStore {
    fn load(&self, key: &str) -> Result<BTreeSet<usize>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(BTreeSet::new());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading bookmarks from {}", path.display()))?;
        let file: BookmarkFile = toml::from_str(&data)
            .with_context(|| format!("parsing bookmarks in {}", path.display()))?;
        Ok(file.pages.into_iter().collect())
    }

    fn save(&self, key: &str, pages: &BTreeSet<usize>) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating cache dir {}", parent.display()))?;
        }
        let file = BookmarkFile {
            pages: pages.iter().copied().collect(),
        };
        let contents = toml::to_string(&file).context("serializing bookmarks")?;
        fs::write(&path, contents)
            .with_context(|| format!("writing bookmarks to {}", path.display()))?;
        tracing::debug!(path = %path.display(), count = pages.len(), "Saved bookmarks");
        Ok(())
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookmarkStore {
    books: Arc<Mutex<HashMap<String, BTreeSet<usize>>>>,
}

impl MemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(self, key: &str, pages: impl IntoIterator<Item = usize>) -> Self {
        if let Ok(mut books) = self.books.lock() {
            books.insert(key.to_string(), pages.into_iter().collect());
        }
        self
    }
}

impl BookmarkStore for MemoryBookmarkStore {
    fn load(&self, key: &str) -> Result<BTreeSet<usize>> {
        let books = self
            .books
            .lock()
            .map_err(|_| anyhow!("bookmark store lock poisoned"))?;
        Ok(books.get(key).cloned().unwrap_or_default())
    }

    fn save(&self, key: &str, pages: &BTreeSet<usize>) -> Result<()> {
        let mut books = self
            .books
            .lock()
            .map_err(|_| anyhow!("bookmark store lock poisoned"))?;
        books.insert(key.to_string(), pages.clone());
        Ok(())
    }
}
