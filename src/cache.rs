//! Per-book cache: reading position, config overrides and the recent-books
//! list that feeds the library panel.
//!
//! Every book gets a directory named after the SHA-256 of its key (see
//! [`book_cache_dir`]). Files are tiny TOML documents; write errors are
//! logged and otherwise ignored to keep the UI responsive.

use crate::config::{AppConfig, clamp_config, parse_config, serialize_config};
use flipbook_core::store::book_cache_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

const POSITION_FILE: &str = "position.toml";
const CONFIG_FILE: &str = "config.toml";
const RECENT_FILE: &str = "recent.toml";
const PAGES_DIR: &str = "pages";
pub const RECENT_LIMIT: usize = 32;

pub fn book_dir(root: &Path, key: &str) -> PathBuf {
    book_cache_dir(root, key)
}

/// Where downloaded or rasterized page images for `key` live.
pub fn pages_dir(root: &Path, key: &str) -> PathBuf {
    book_dir(root, key).join(PAGES_DIR)
}

#[derive(Debug, Serialize, Deserialize)]
struct PositionEntry {
    position: usize,
}

pub fn load_position(root: &Path, key: &str) -> Option<usize> {
    let path = book_dir(root, key).join(POSITION_FILE);
    let data = fs::read_to_string(path).ok()?;
    let entry: PositionEntry = toml::from_str(&data).ok()?;
    Some(entry.position)
}

pub fn save_position(root: &Path, key: &str, position: usize) {
    write_toml(
        &book_dir(root, key).join(POSITION_FILE),
        &PositionEntry { position },
    );
}

pub fn load_book_config(root: &Path, key: &str) -> Option<AppConfig> {
    let path = book_dir(root, key).join(CONFIG_FILE);
    let data = fs::read_to_string(&path).ok()?;
    match parse_config(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(path = %path.display(), "Ignoring unreadable book config: {err:#}");
            None
        }
    }
}

/// Base config with the book's cached overrides applied, if any.
pub fn effective_book_config(base: &AppConfig, key: &str) -> AppConfig {
    match load_book_config(&base.cache_root(), key) {
        Some(overrides) => {
            debug!(%key, "Applying per-book config overrides");
            let mut config = overrides.with_base_overrides(base);
            clamp_config(&mut config);
            config
        }
        None => base.clone(),
    }
}

/// Written in the same table layout as `conf/config.toml`.
pub fn save_book_config(root: &Path, key: &str, config: &AppConfig) {
    let path = book_dir(root, key).join(CONFIG_FILE);
    match serialize_config(config) {
        Ok(contents) => write_cache_file(&path, &contents),
        Err(err) => warn!(path = %path.display(), "Failed to serialize book config: {err:#}"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentBook {
    /// Source the book was opened from; reopening loads it again.
    pub source: String,
    pub title: String,
    pub total_pages: usize,
    pub last_opened_secs: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecentFile {
    #[serde(default)]
    books: Vec<RecentBook>,
}

pub fn list_recent_books(root: &Path, limit: usize) -> Vec<RecentBook> {
    let Ok(data) = fs::read_to_string(root.join(RECENT_FILE)) else {
        return Vec::new();
    };
    let mut books = match toml::from_str::<RecentFile>(&data) {
        Ok(file) => file.books,
        Err(err) => {
            warn!("Ignoring unreadable recent-books list: {err}");
            return Vec::new();
        }
    };
    books.sort_by(|a, b| b.last_opened_secs.cmp(&a.last_opened_secs));
    books.truncate(limit);
    books
}

/// Move `source` to the top of the recent list.
pub fn remember_book(root: &Path, source: &str, title: &str, total_pages: usize) {
    let mut books = list_recent_books(root, RECENT_LIMIT);
    books.retain(|book| book.source != source);
    let last_opened_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    books.insert(
        0,
        RecentBook {
            source: source.to_string(),
            title: title.to_string(),
            total_pages,
            last_opened_secs,
        },
    );
    books.truncate(RECENT_LIMIT);
    write_toml(&root.join(RECENT_FILE), &RecentFile { books });
}

fn write_toml<T: Serialize>(path: &Path, value: &T) {
    match toml::to_string(value) {
        Ok(contents) => write_cache_file(path, &contents),
        Err(err) => warn!(path = %path.display(), "Failed to serialize cache entry: {err}"),
    }
}

fn write_cache_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(path = %parent.display(), "Failed to create cache dir: {err}");
            return;
        }
    }
    if let Err(err) = fs::write(path, contents) {
        warn!(path = %path.display(), "Failed to write cache file: {err}");
    } else {
        debug!(path = %path.display(), "Wrote cache file");
    }
}
