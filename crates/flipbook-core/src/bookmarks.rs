//! Bookmark ledger: the set of page indices the reader has marked.

use std::collections::BTreeSet;

/// Bookmark mutation requested by navigation and applied by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkOp {
    Toggle(usize),
    Remove(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkLedger {
    pages: BTreeSet<usize>,
}

impl BookmarkLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: BookmarkOp) {
        match op {
            BookmarkOp::Toggle(page) => self.toggle(page),
            BookmarkOp::Remove(page) => self.remove(page),
        }
    }

    pub fn toggle(&mut self, page: usize) {
        if !self.pages.remove(&page) {
            self.pages.insert(page);
        }
    }

    /// Removing a page that is not bookmarked is a no-op.
    pub fn remove(&mut self, page: usize) {
        self.pages.remove(&page);
    }

    pub fn contains(&self, page: usize) -> bool {
        self.pages.contains(&page)
    }

    /// Bookmarked pages in ascending order.
    pub fn list(&self) -> Vec<usize> {
        self.pages.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn replace(&mut self, pages: BTreeSet<usize>) {
        self.pages = pages;
    }

    pub fn as_set(&self) -> &BTreeSet<usize> {
        &self.pages
    }
}
