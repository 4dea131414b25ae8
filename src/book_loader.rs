//! Resolve a requested book into an ordered list of local page images.
//!
//! A request is one or more sources taken from the command line, the open
//! path input or the recent-books list:
//! - a directory of images, ordered naturally by file name
//! - one or more image files or `http(s)://` image URLs
//! - a `.pdf`, rasterized into the book's cache
//! - a `.toml` library manifest with a `title` and ordered `pages`
//!
//! Remote pages are downloaded into the book's cache and reused on reopen.

use crate::cache::pages_dir;
use crate::rasterize::default_rasterizer;
use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering as AtomicOrdering},
};
use std::time::{Duration, UNIX_EPOCH};
use tracing::{debug, info, warn};

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

static NATURAL_CHUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)|(\D+)").expect("valid natural sort regex"));

/// A book ready to hand to the reader session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBook {
    /// Stable identity for persistence. Reopening this string as a single
    /// source (or, for image lists, split on newlines) loads the same book.
    pub key: String,
    pub title: String,
    pub pages: Vec<String>,
}

/// Cancellation flag shared between the UI and a running load.
#[derive(Clone, Debug, Default)]
pub struct LoadToken {
    cancelled: Arc<AtomicBool>,
}

impl LoadToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, AtomicOrdering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Acquire)
    }

    pub(crate) fn check(&self, stage: &'static str) -> Result<()> {
        if self.is_cancelled() {
            return Err(anyhow!("book load cancelled at stage={stage}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookRequest {
    Directory(PathBuf),
    Pdf(PathBuf),
    Manifest(PathBuf),
    Images(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct LibraryManifest {
    #[serde(default)]
    title: Option<String>,
    pages: Vec<String>,
}

/// Split a recent-book key back into the sources it was opened from.
pub fn sources_from_key(key: &str) -> Vec<String> {
    key.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn classify_request(sources: &[String]) -> Result<BookRequest> {
    let sources: Vec<String> = sources
        .iter()
        .map(|source| source.trim().to_string())
        .filter(|source| !source.is_empty())
        .collect();
    match sources.as_slice() {
        [] => bail!("no book source given"),
        [single] if !is_remote(single) => {
            let path = PathBuf::from(single);
            if path.is_dir() {
                return Ok(BookRequest::Directory(path));
            }
            match extension_of(&path).as_deref() {
                Some("pdf") => Ok(BookRequest::Pdf(path)),
                Some("toml") => Ok(BookRequest::Manifest(path)),
                _ => Ok(BookRequest::Images(vec![single.clone()])),
            }
        }
        _ => Ok(BookRequest::Images(sources)),
    }
}

/// Resolve `sources` into a book whose pages are all local image paths.
pub fn load_book(sources: &[String], cache_root: &Path, token: &LoadToken) -> Result<LoadedBook> {
    let request = classify_request(sources)?;
    debug!(?request, "Resolving book request");
    let (key, title, entries) = match request {
        BookRequest::Directory(dir) => {
            let key = path_key(&dir);
            let title = file_title(&dir);
            let images = list_images(&dir)?;
            (key, title, images)
        }
        BookRequest::Pdf(pdf) => {
            if !pdf.is_file() {
                bail!("File not found: {}", pdf.display());
            }
            let key = path_key(&pdf);
            let title = file_title(&pdf);
            token.check("rasterize")?;
            let rasterizer = default_rasterizer(pdf_render_dir(cache_root, &key, &pdf)?);
            let pages = rasterizer
                .rasterize(&pdf, token)?
                .into_iter()
                .map(|path| path.display().to_string())
                .collect();
            (key, title, pages)
        }
        BookRequest::Manifest(path) => {
            let key = path_key(&path);
            let (title, pages) = read_manifest(&path)?;
            (key, title, pages)
        }
        BookRequest::Images(list) => {
            let entries = order_image_list(&list)?;
            let key = entries.join("\n");
            let title = entries
                .first()
                .map(|first| file_title(Path::new(first)))
                .unwrap_or_else(|| "Untitled".to_string());
            (key, title, entries)
        }
    };
    token.check("resolve")?;

    if entries.is_empty() {
        bail!("{title} has no pages");
    }
    let pages = materialize_pages(&entries, &pages_dir(cache_root, &key), token)?;
    info!(%title, pages = pages.len(), "Resolved book");
    Ok(LoadedBook { key, title, pages })
}

/// Render cache for `pdf`, keyed by its size and modification time so an
/// edited file is rendered again.
fn pdf_render_dir(cache_root: &Path, key: &str, pdf: &Path) -> Result<PathBuf> {
    let metadata =
        fs::metadata(pdf).with_context(|| format!("reading metadata of {}", pdf.display()))?;
    let modified = metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    Ok(pages_dir(cache_root, key).join(format!("pdf-{}-{modified}", metadata.len())))
}

fn read_manifest(path: &Path) -> Result<(String, Vec<String>)> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading manifest {}", path.display()))?;
    let manifest: LibraryManifest =
        toml::from_str(&data).with_context(|| format!("parsing manifest {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let pages = manifest
        .pages
        .into_iter()
        .map(|page| {
            if is_remote(&page) || Path::new(&page).is_absolute() {
                page
            } else {
                base.join(page).display().to_string()
            }
        })
        .collect();
    let title = manifest
        .title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| file_title(path));
    Ok((title, pages))
}

/// Image files of `dir`, natural order by file name.
pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_image_path(path))
        .collect();
    images.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    if images.is_empty() {
        bail!("no images found in {}", dir.display());
    }
    Ok(images
        .into_iter()
        .map(|path| path.display().to_string())
        .collect())
}

/// Local files are validated and ordered naturally; URLs keep their order
/// after the local files.
fn order_image_list(list: &[String]) -> Result<Vec<String>> {
    let (remote, local): (Vec<&String>, Vec<&String>) =
        list.iter().partition(|entry| is_remote(entry));
    let mut local: Vec<PathBuf> = local.into_iter().map(PathBuf::from).collect();
    for path in &local {
        if !path.is_file() {
            bail!("File not found: {}", path.display());
        }
        if !is_image_path(path) {
            bail!("{} is not a supported image", path.display());
        }
    }
    local.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    Ok(local
        .into_iter()
        .map(|path| path.display().to_string())
        .chain(remote.into_iter().cloned())
        .collect())
}

fn materialize_pages(entries: &[String], dir: &Path, token: &LoadToken) -> Result<Vec<String>> {
    if !entries.iter().any(|entry| is_remote(entry)) {
        return Ok(entries.to_vec());
    }
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .context("building HTTP client")?;
    let mut pages = Vec::with_capacity(entries.len());
    for entry in entries {
        token.check("download")?;
        if is_remote(entry) {
            let path = fetch_remote(&client, entry, dir)?;
            pages.push(path.display().to_string());
        } else {
            pages.push(entry.clone());
        }
    }
    Ok(pages)
}

fn fetch_remote(client: &reqwest::blocking::Client, url: &str, dir: &Path) -> Result<PathBuf> {
    let stem = remote_stem(url);
    if let Some(cached) = IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
    {
        debug!(%url, path = %cached.display(), "Using cached page image");
        return Ok(cached);
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .with_context(|| format!("downloading {url}"))?;
    let format =
        image::guess_format(&bytes).with_context(|| format!("{url} did not return an image"))?;
    let ext = format.extensions_str().first().copied().unwrap_or("img");
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{stem}.{ext}"));
    fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    info!(%url, bytes = bytes.len(), path = %path.display(), "Downloaded page image");
    Ok(path)
}

fn remote_stem(url: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(url.as_bytes()));
    digest[..24].to_string()
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn is_image_path(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

fn path_key(path: &Path) -> String {
    match fs::canonicalize(path) {
        Ok(canonical) => canonical.display().to_string(),
        Err(err) => {
            warn!(path = %path.display(), "Could not canonicalize book path: {err}");
            path.display().to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum NaturalChunk {
    /// Digit run without leading zeros, compared by length then digits.
    Number(usize, String),
    Text(String),
}

fn natural_key(name: &str) -> Vec<NaturalChunk> {
    NATURAL_CHUNK
        .captures_iter(name)
        .filter_map(|caps| {
            if let Some(digits) = caps.get(1) {
                let trimmed = digits.as_str().trim_start_matches('0');
                Some(NaturalChunk::Number(trimmed.len(), trimmed.to_string()))
            } else {
                caps.get(2)
                    .map(|text| NaturalChunk::Text(text.as_str().to_lowercase()))
            }
        })
        .collect()
}

/// Numeric-aware, case-insensitive comparison: `page2` sorts before `page10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a)
        .cmp(&natural_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"stub").expect("write file");
        path
    }

    #[test]
    fn natural_order_compares_digit_runs_by_value() {
        let mut names = vec!["page10.png", "Page2.png", "page1.png", "page002b.png"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, ["page1.png", "Page2.png", "page002b.png", "page10.png"]);
    }

    #[test]
    fn directory_lists_only_images_in_natural_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "10.jpg");
        touch(dir.path(), "2.PNG");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "1.webp");

        let images = list_images(dir.path()).expect("images");
        let names: Vec<String> = images
            .iter()
            .map(|path| file_name(Path::new(path)))
            .collect();
        assert_eq!(names, ["1.webp", "2.PNG", "10.jpg"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(list_images(dir.path()).is_err());
    }

    #[test]
    fn requests_are_classified_by_shape() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dir_source = dir.path().display().to_string();
        assert_eq!(
            classify_request(&[dir_source]).expect("dir"),
            BookRequest::Directory(dir.path().to_path_buf())
        );
        assert_eq!(
            classify_request(&["book.PDF".to_string()]).expect("pdf"),
            BookRequest::Pdf(PathBuf::from("book.PDF"))
        );
        assert_eq!(
            classify_request(&["library/sample.toml".to_string()]).expect("manifest"),
            BookRequest::Manifest(PathBuf::from("library/sample.toml"))
        );
        assert!(matches!(
            classify_request(&["https://example.com/a.png".to_string()]).expect("url"),
            BookRequest::Images(_)
        ));
        assert!(classify_request(&["  ".to_string()]).is_err());
    }

    #[test]
    fn manifest_resolves_relative_pages_against_its_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = tempfile::tempdir().expect("cache");
        touch(dir.path(), "cover.png");
        touch(dir.path(), "back.png");
        let manifest = dir.path().join("book.toml");
        fs::write(
            &manifest,
            "title = \"Nature Photography\"\npages = [\"cover.png\", \"back.png\"]\n",
        )
        .expect("write manifest");

        let book = load_book(
            &[manifest.display().to_string()],
            cache.path(),
            &LoadToken::new(),
        )
        .expect("load manifest");
        assert_eq!(book.title, "Nature Photography");
        assert_eq!(book.pages.len(), 2);
        assert!(book.pages[0].ends_with("cover.png"));
        assert!(Path::new(&book.pages[1]).is_file());
    }

    #[test]
    fn image_list_key_reopens_the_same_book() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = tempfile::tempdir().expect("cache");
        let b = touch(dir.path(), "b.png");
        let a = touch(dir.path(), "a.png");
        let sources = vec![b.display().to_string(), a.display().to_string()];

        let book = load_book(&sources, cache.path(), &LoadToken::new()).expect("load list");
        assert!(book.pages[0].ends_with("a.png"));
        assert_eq!(book.title, "a");

        let reopened = load_book(&sources_from_key(&book.key), cache.path(), &LoadToken::new())
            .expect("reopen");
        assert_eq!(reopened, book);
    }

    #[test]
    fn missing_image_file_is_reported() {
        let cache = tempfile::tempdir().expect("cache");
        let err = load_book(
            &["/definitely/missing.png".to_string()],
            cache.path(),
            &LoadToken::new(),
        )
        .expect_err("missing file");
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn cancelled_token_stops_the_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = tempfile::tempdir().expect("cache");
        touch(dir.path(), "1.png");
        let token = LoadToken::new();
        token.cancel();
        let err = load_book(&[dir.path().display().to_string()], cache.path(), &token)
            .expect_err("cancelled");
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn superseded_pdf_load_stops_before_rendering() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = tempfile::tempdir().expect("cache");
        let pdf = touch(dir.path(), "book.pdf");
        let token = LoadToken::new();
        token.cancel();
        let err = load_book(&[pdf.display().to_string()], cache.path(), &token)
            .expect_err("cancelled");
        assert!(err.to_string().contains("stage=rasterize"));
    }

    #[test]
    fn edited_pdf_gets_a_fresh_render_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = tempfile::tempdir().expect("cache");
        let pdf = touch(dir.path(), "book.pdf");
        let first = pdf_render_dir(cache.path(), "book", &pdf).expect("first");
        assert_eq!(
            pdf_render_dir(cache.path(), "book", &pdf).expect("unchanged"),
            first
        );

        fs::write(&pdf, b"a longer replacement document").expect("rewrite pdf");
        let second = pdf_render_dir(cache.path(), "book", &pdf).expect("second");
        assert_ne!(first, second);
        assert!(second.starts_with(pages_dir(cache.path(), "book")));
    }

    #[test]
    fn cached_remote_pages_are_reused_without_network() {
        let cache = tempfile::tempdir().expect("cache");
        let url = "https://picsum.photos/seed/cover/600/848";
        let sources = vec![url.to_string()];
        let key = sources.join("\n");
        let dir = pages_dir(cache.path(), &key);
        fs::create_dir_all(&dir).expect("pages dir");
        let cached = dir.join(format!("{}.jpg", remote_stem(url)));
        fs::write(&cached, b"jpeg").expect("seed cache");

        let book = load_book(&sources, cache.path(), &LoadToken::new()).expect("cached load");
        assert_eq!(book.pages, vec![cached.display().to_string()]);
    }
}
