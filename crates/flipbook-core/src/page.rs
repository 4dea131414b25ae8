//! Logical pages of a loaded book.
//!
//! A book is an ordered list of [`Page`]s whose indices run `0..N-1` without
//! gaps. Content references are opaque: they may be local paths, remote URLs
//! or data URLs, and the engine never inspects them.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 1x1 transparent PNG used as the back face of a trailing half sheet.
pub const TRANSPARENT_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Index carried by the synthetic blank page.
pub const PLACEHOLDER_INDEX: i64 = -1;

/// Cosmetic page classification; flip logic ignores it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PageKind {
    Cover,
    #[default]
    Content,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct Page {
    #[ts(type = "number")]
    pub index: i64,
    pub content_url: String,
    #[serde(default)]
    pub kind: PageKind,
}

impl Page {
    pub fn new(index: usize, content_url: impl Into<String>, kind: PageKind) -> Self {
        Self {
            index: index as i64,
            content_url: content_url.into(),
            kind,
        }
    }

    /// Blank, transparent page filling the back of the last sheet of an
    /// odd-length book.
    pub fn placeholder() -> Self {
        Self {
            index: PLACEHOLDER_INDEX,
            content_url: TRANSPARENT_PIXEL.to_string(),
            kind: PageKind::Content,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.index == PLACEHOLDER_INDEX
    }

    /// 1-based number shown to readers; `None` for the placeholder.
    pub fn display_number(&self) -> Option<usize> {
        usize::try_from(self.index).ok().map(|idx| idx + 1)
    }
}

/// Build a page list from ordered content references.
///
/// The first and last page are classified as covers.
pub fn pages_from_sources<I, S>(sources: I) -> Vec<Page>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let urls: Vec<String> = sources.into_iter().map(Into::into).collect();
    let last = urls.len().saturating_sub(1);
    urls.into_iter()
        .enumerate()
        .map(|(idx, url)| {
            let kind = if idx == 0 || idx == last {
                PageKind::Cover
            } else {
                PageKind::Content
            };
            Page::new(idx, url, kind)
        })
        .collect()
}

/// Check that indices are exactly `0..N-1` in order.
pub fn validate_pages(pages: &[Page]) -> Result<()> {
    for (expected, page) in pages.iter().enumerate() {
        if page.index != expected as i64 {
            bail!(
                "page at position {expected} has index {} (indices must be contiguous from 0)",
                page.index
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_get_cover_classification_at_both_ends() {
        let pages = pages_from_sources(["a.png", "b.png", "c.png"]);
        let kinds: Vec<PageKind> = pages.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![PageKind::Cover, PageKind::Content, PageKind::Cover]
        );
        assert_eq!(pages[2].index, 2);
    }

    #[test]
    fn validation_rejects_gaps_and_duplicates() {
        let mut pages = pages_from_sources(["a", "b", "c"]);
        assert!(validate_pages(&pages).is_ok());

        pages[1].index = 2;
        let err = validate_pages(&pages).expect_err("duplicate index");
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn placeholder_has_no_display_number() {
        let blank = Page::placeholder();
        assert!(blank.is_placeholder());
        assert_eq!(blank.display_number(), None);
        assert_eq!(Page::new(4, "x", PageKind::Content).display_number(), Some(5));
    }
}
