use crate::bookmarks::{BookmarkLedger, BookmarkOp};
use crate::flip::target_angle;
use crate::navigation::{NavAction, NavOutcome, NavigationState, PanelState};
use crate::page::{Page, validate_pages};
use crate::scale::ScaleController;
use crate::sheet::{Sheet, current_sheet_index, derive_sheets, sheet_z_index, total_sheets};
use crate::store::BookmarkStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use ts_rs::TS;

/// A book handed to the session: a stable key for persistence, a display
/// title and the ordered page list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSource {
    pub key: String,
    pub title: String,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SheetView {
    pub sheet_index: usize,
    #[ts(type = "number")]
    pub front_index: i64,
    pub front_url: String,
    #[ts(type = "number")]
    pub back_index: i64,
    pub back_url: String,
    pub target_angle: f32,
    #[ts(type = "number")]
    pub z_index: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ThumbnailView {
    pub index: usize,
    pub content_url: String,
    pub label: String,
    pub is_current: bool,
    pub is_bookmarked: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReaderSnapshot {
    pub key: String,
    pub title: String,
    pub current_position: usize,
    pub total_pages: usize,
    pub current_sheet: usize,
    pub total_sheets: usize,
    pub scale: f32,
    pub scale_percent: u32,
    pub panels: PanelState,
    pub is_fullscreen: bool,
    pub bookmarks: Vec<usize>,
    pub current_bookmarked: bool,
    pub can_prev: bool,
    pub can_next: bool,
    pub page_label: String,
    pub progress: f64,
    pub sheets: Vec<SheetView>,
    pub thumbnails: Vec<ThumbnailView>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum SessionCommand {
    GetSnapshot,
    NextPage,
    PrevPage,
    JumpTo { page: usize },
    ZoomIn,
    ZoomOut,
    ToggleThumbnails,
    ToggleBookmarksList,
    ToggleLibrary,
    ToggleBookmarkCurrent,
    RemoveBookmark { page: usize },
    CloseAllPanels,
    ToggleFullscreen,
    FitViewport { width: f32 },
    SetScale { scale: f32 },
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "reader_get_snapshot",
            Self::NextPage => "reader_next_page",
            Self::PrevPage => "reader_prev_page",
            Self::JumpTo { .. } => "reader_jump_to",
            Self::ZoomIn => "reader_zoom_in",
            Self::ZoomOut => "reader_zoom_out",
            Self::ToggleThumbnails => "reader_toggle_thumbnails",
            Self::ToggleBookmarksList => "reader_toggle_bookmarks_list",
            Self::ToggleLibrary => "reader_toggle_library",
            Self::ToggleBookmarkCurrent => "reader_toggle_bookmark_current",
            Self::RemoveBookmark { .. } => "reader_remove_bookmark",
            Self::CloseAllPanels => "reader_close_all_panels",
            Self::ToggleFullscreen => "reader_toggle_fullscreen",
            Self::FitViewport { .. } => "reader_fit_viewport",
            Self::SetScale { .. } => "reader_set_scale",
        }
    }

    pub fn nav_action(&self) -> Option<NavAction> {
        Some(match *self {
            Self::GetSnapshot => return None,
            Self::NextPage => NavAction::Next,
            Self::PrevPage => NavAction::Prev,
            Self::JumpTo { page } => NavAction::JumpTo(page),
            Self::ZoomIn => NavAction::ZoomIn,
            Self::ZoomOut => NavAction::ZoomOut,
            Self::ToggleThumbnails => NavAction::ToggleThumbnails,
            Self::ToggleBookmarksList => NavAction::ToggleBookmarksList,
            Self::ToggleLibrary => NavAction::ToggleLibrary,
            Self::ToggleBookmarkCurrent => NavAction::ToggleBookmarkCurrent,
            Self::RemoveBookmark { page } => NavAction::RemoveBookmark(page),
            Self::CloseAllPanels => NavAction::CloseAllPanels,
            Self::ToggleFullscreen => NavAction::ToggleFullscreen,
            Self::FitViewport { width } => NavAction::FitViewport { width },
            Self::SetScale { scale } => NavAction::SetScale(scale),
        })
    }
}

/// What changed as a result of one session operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum SessionEffect {
    BookLoaded { total_pages: usize },
    PositionChanged { position: usize },
    ScaleChanged { scale: f32 },
    PanelsChanged { panels: PanelState },
    FullscreenChanged { fullscreen: bool },
    BookmarksChanged,
}

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub action: &'static str,
    pub snapshot: ReaderSnapshot,
    pub effects: Vec<SessionEffect>,
}

/// One reading session: the loaded book, its navigation state and its
/// bookmarks. All mutation goes through `load_book` and `dispatch`.
pub struct ReaderSession {
    book: BookSource,
    nav: NavigationState,
    bookmarks: BookmarkLedger,
    resize: ScaleController,
    store: Box<dyn BookmarkStore>,
}

impl ReaderSession {
    pub fn new(store: Box<dyn BookmarkStore>) -> Self {
        Self::with_scale(store, crate::navigation::DEFAULT_SCALE)
    }

    pub fn with_scale(store: Box<dyn BookmarkStore>, scale: f32) -> Self {
        Self {
            book: BookSource::default(),
            nav: NavigationState::new(0, scale),
            bookmarks: BookmarkLedger::new(),
            resize: ScaleController::default(),
            store,
        }
    }

    pub fn key(&self) -> &str {
        &self.book.key
    }

    pub fn title(&self) -> &str {
        &self.book.title
    }

    pub fn pages(&self) -> &[Page] {
        &self.book.pages
    }

    pub fn has_book(&self) -> bool {
        !self.book.key.is_empty()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn bookmarks(&self) -> &BookmarkLedger {
        &self.bookmarks
    }

    pub fn current_position(&self) -> usize {
        self.nav.current_position()
    }

    pub fn current_sheet(&self) -> usize {
        current_sheet_index(self.nav.current_position())
    }

    pub fn total_sheets(&self) -> usize {
        total_sheets(self.book.pages.len())
    }

    pub fn sheets(&self) -> Vec<Sheet> {
        derive_sheets(&self.book.pages)
    }

    /// Replace the open book. Bookmarks of the previous book are dropped
    /// before the new book's saved bookmarks are read.
    pub fn load_book(&mut self, source: BookSource) -> Result<Vec<SessionEffect>> {
        validate_pages(&source.pages)?;
        let total = source.pages.len();
        self.book = source;
        self.nav.reset_for_book(total);
        self.bookmarks.clear();

        let saved = match self.store.load(&self.book.key) {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(key = %self.book.key, "Failed to load bookmarks: {err:#}");
                BTreeSet::new()
            }
        };
        let restored: BTreeSet<usize> = saved.into_iter().filter(|page| *page < total).collect();
        self.bookmarks.replace(restored);

        tracing::info!(
            key = %self.book.key,
            title = %self.book.title,
            pages = total,
            sheets = self.total_sheets(),
            bookmarks = self.bookmarks.len(),
            "Loaded book into session"
        );
        Ok(vec![
            SessionEffect::BookLoaded { total_pages: total },
            SessionEffect::PositionChanged { position: 0 },
            SessionEffect::PanelsChanged {
                panels: self.nav.panels(),
            },
            SessionEffect::BookmarksChanged,
        ])
    }

    pub fn dispatch(&mut self, action: NavAction) -> Vec<SessionEffect> {
        let before = self.nav.clone();
        let mut effects = Vec::new();
        match self.nav.dispatch(action) {
            NavOutcome::Unchanged => return effects,
            NavOutcome::Delegated(op) => {
                if self.apply_bookmark_op(op) {
                    effects.push(SessionEffect::BookmarksChanged);
                }
                return effects;
            }
            NavOutcome::Changed => {}
        }

        if before.current_position() != self.nav.current_position() {
            tracing::debug!(
                from = before.current_position(),
                to = self.nav.current_position(),
                "Position changed"
            );
            effects.push(SessionEffect::PositionChanged {
                position: self.nav.current_position(),
            });
        }
        if before.scale() != self.nav.scale() {
            effects.push(SessionEffect::ScaleChanged {
                scale: self.nav.scale(),
            });
        }
        if before.panels() != self.nav.panels() {
            effects.push(SessionEffect::PanelsChanged {
                panels: self.nav.panels(),
            });
        }
        if before.is_fullscreen() != self.nav.is_fullscreen() {
            effects.push(SessionEffect::FullscreenChanged {
                fullscreen: self.nav.is_fullscreen(),
            });
        }
        effects
    }

    pub fn apply_command(&mut self, command: SessionCommand) -> SessionEvent {
        let action = command.action();
        let effects = command
            .nav_action()
            .map(|nav_action| self.dispatch(nav_action))
            .unwrap_or_default();
        SessionEvent {
            action,
            snapshot: self.snapshot(),
            effects,
        }
    }

    pub fn set_resize_debounce(&mut self, debounce: Duration) {
        self.resize.set_debounce(debounce);
    }

    pub fn on_viewport_resize(&mut self, width: f32, now: Instant) {
        self.resize.on_resize(width, now);
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Fire the resize debounce if its quiet period is over.
    pub fn poll_deferred(&mut self, now: Instant) -> Vec<SessionEffect> {
        match self.resize.poll(now) {
            Some(width) => {
                tracing::debug!(width, "Applying settled viewport width");
                self.dispatch(NavAction::FitViewport { width })
            }
            None => Vec::new(),
        }
    }

    /// Cancel pending deferred work. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.resize.teardown();
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        let position = self.nav.current_position();
        let total = self.nav.total_pages();
        let current_sheet = self.current_sheet();
        let sheets = self
            .sheets()
            .into_iter()
            .map(|sheet| SheetView {
                sheet_index: sheet.sheet_index,
                front_index: sheet.front.index,
                front_url: sheet.front.content_url,
                back_index: sheet.back.index,
                back_url: sheet.back.content_url,
                target_angle: target_angle(sheet.sheet_index, current_sheet),
                z_index: sheet_z_index(sheet.sheet_index, current_sheet),
            })
            .collect();
        let thumbnails = self
            .book
            .pages
            .iter()
            .enumerate()
            .map(|(idx, page)| ThumbnailView {
                index: idx,
                content_url: page.content_url.clone(),
                label: format!("{}", idx + 1),
                is_current: idx == position,
                is_bookmarked: self.bookmarks.contains(idx),
            })
            .collect();

        ReaderSnapshot {
            key: self.book.key.clone(),
            title: self.book.title.clone(),
            current_position: position,
            total_pages: total,
            current_sheet,
            total_sheets: self.total_sheets(),
            scale: self.nav.scale(),
            scale_percent: (self.nav.scale() * 100.0).round() as u32,
            panels: self.nav.panels(),
            is_fullscreen: self.nav.is_fullscreen(),
            bookmarks: self.bookmarks.list(),
            current_bookmarked: total > 0 && self.bookmarks.contains(position),
            can_prev: self.nav.can_prev(),
            can_next: self.nav.can_next(),
            page_label: page_label(position, total),
            progress: reading_progress(position, total),
            sheets,
            thumbnails,
        }
    }

    fn apply_bookmark_op(&mut self, op: BookmarkOp) -> bool {
        if let BookmarkOp::Toggle(page) = op {
            if page >= self.nav.total_pages() {
                return false;
            }
        }
        let before = self.bookmarks.clone();
        self.bookmarks.apply(op);
        if before == self.bookmarks {
            return false;
        }
        self.persist_bookmarks();
        true
    }

    fn persist_bookmarks(&self) {
        if self.book.key.is_empty() {
            return;
        }
        if let Err(err) = self.store.save(&self.book.key, self.bookmarks.as_set()) {
            tracing::warn!(key = %self.book.key, "Failed to persist bookmarks: {err:#}");
        }
    }
}

impl Drop for ReaderSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Toolbar label, e.g. `3 / 12`.
pub fn page_label(position: usize, total: usize) -> String {
    if total == 0 {
        return "0 / 0".to_string();
    }
    format!("{} / {}", position + 1, total)
}

pub fn reading_progress(position: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((position + 1) as f64 / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::pages_from_sources;
    use crate::store::MemoryBookmarkStore;
    use anyhow::anyhow;

    fn book(key: &str, count: usize) -> BookSource {
        BookSource {
            key: key.to_string(),
            title: format!("Book {key}"),
            pages: pages_from_sources((0..count).map(|i| format!("{key}/{i}.png"))),
        }
    }

    fn build_test_session(store: MemoryBookmarkStore, count: usize) -> ReaderSession {
        let mut session = ReaderSession::new(Box::new(store));
        session.load_book(book("alpha", count)).expect("load book");
        session
    }

    struct FailingStore;

    impl BookmarkStore for FailingStore {
        fn load(&self, _key: &str) -> Result<BTreeSet<usize>> {
            Err(anyhow!("disk on fire"))
        }

        fn save(&self, _key: &str, _pages: &BTreeSet<usize>) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn bookmark_toggle_is_persisted_to_store() {
        let store = MemoryBookmarkStore::new();
        let mut session = build_test_session(store.clone(), 6);
        session.dispatch(NavAction::Next);
        let effects = session.dispatch(NavAction::ToggleBookmarkCurrent);
        assert!(matches!(effects.as_slice(), [SessionEffect::BookmarksChanged]));
        assert_eq!(store.load("alpha").expect("load"), BTreeSet::from([2]));

        session.dispatch(NavAction::ToggleBookmarkCurrent);
        assert!(store.load("alpha").expect("load").is_empty());
    }

    #[test]
    fn book_swap_clears_bookmarks_and_restores_saved_ones() {
        let store = MemoryBookmarkStore::new().with_book("beta", [0, 2, 40]);
        let mut session = build_test_session(store, 8);
        session.dispatch(NavAction::JumpTo(6));
        session.dispatch(NavAction::ToggleBookmarkCurrent);
        session.dispatch(NavAction::ToggleThumbnails);

        session.load_book(book("beta", 5)).expect("load second book");
        assert_eq!(session.current_position(), 0);
        assert_eq!(session.bookmarks().list(), vec![0, 2]);
        assert!(!session.navigation().panels().any_open());
        assert_eq!(session.title(), "Book beta");
    }

    #[test]
    fn invalid_page_list_is_rejected_and_previous_book_kept() {
        let mut session = build_test_session(MemoryBookmarkStore::new(), 4);
        let mut broken = book("broken", 3);
        broken.pages[2].index = 7;
        assert!(session.load_book(broken).is_err());
        assert_eq!(session.key(), "alpha");
        assert_eq!(session.pages().len(), 4);
    }

    #[test]
    fn store_failures_are_treated_as_empty() {
        let mut session = ReaderSession::new(Box::new(FailingStore));
        session.load_book(book("gamma", 4)).expect("load book");
        assert!(session.bookmarks().is_empty());
        let effects = session.dispatch(NavAction::ToggleBookmarkCurrent);
        assert_eq!(effects, vec![SessionEffect::BookmarksChanged]);
        assert!(session.bookmarks().contains(0));
    }

    #[test]
    fn empty_book_ignores_bookmark_toggle() {
        let mut session = build_test_session(MemoryBookmarkStore::new(), 0);
        assert!(session.dispatch(NavAction::ToggleBookmarkCurrent).is_empty());
        let snapshot = session.snapshot();
        assert!(snapshot.sheets.is_empty());
        assert_eq!(snapshot.page_label, "0 / 0");
        assert!(!snapshot.current_bookmarked);
    }

    #[test]
    fn dispatch_reports_only_what_changed() {
        let mut session = build_test_session(MemoryBookmarkStore::new(), 5);
        assert!(session.dispatch(NavAction::Prev).is_empty());
        assert_eq!(
            session.dispatch(NavAction::Next),
            vec![SessionEffect::PositionChanged { position: 2 }]
        );
        assert!(matches!(
            session.dispatch(NavAction::ToggleFullscreen).as_slice(),
            [SessionEffect::FullscreenChanged { fullscreen: true }]
        ));
        assert!(matches!(
            session.dispatch(NavAction::ZoomIn).as_slice(),
            [SessionEffect::ScaleChanged { .. }]
        ));
    }

    #[test]
    fn session_command_dispatch_emits_expected_action_and_snapshot() {
        let mut session = build_test_session(MemoryBookmarkStore::new(), 7);
        let event = session.apply_command(SessionCommand::JumpTo { page: 5 });
        assert_eq!(event.action, "reader_jump_to");
        assert_eq!(event.snapshot.current_position, 4);
        assert_eq!(event.snapshot.page_label, "5 / 7");
        assert!(event.snapshot.can_prev);
        assert!(event.snapshot.can_next);

        let event = session.apply_command(SessionCommand::GetSnapshot);
        assert_eq!(event.action, "reader_get_snapshot");
        assert!(event.effects.is_empty());
    }

    #[test]
    fn snapshot_describes_sheets_and_thumbnails() {
        let mut session = build_test_session(MemoryBookmarkStore::new(), 5);
        session.dispatch(NavAction::Next);
        session.dispatch(NavAction::ToggleBookmarkCurrent);
        let snapshot = session.snapshot();

        assert_eq!(snapshot.total_sheets, 3);
        assert_eq!(snapshot.current_sheet, 1);
        assert_eq!(snapshot.sheets[0].target_angle, -180.0);
        assert_eq!(snapshot.sheets[1].target_angle, 0.0);
        assert_eq!(snapshot.sheets[1].z_index, 100);
        assert_eq!(snapshot.sheets[2].back_index, -1);
        assert_eq!(snapshot.scale_percent, 100);
        assert!(snapshot.current_bookmarked);

        let current: Vec<usize> = snapshot
            .thumbnails
            .iter()
            .filter(|thumb| thumb.is_current)
            .map(|thumb| thumb.index)
            .collect();
        assert_eq!(current, vec![2]);
        assert!(snapshot.thumbnails[2].is_bookmarked);
    }

    #[test]
    fn session_command_deserializes_from_tagged_json() {
        let command: SessionCommand =
            serde_json::from_str(r#"{"type":"remove_bookmark","page":3}"#).expect("parse");
        assert_eq!(command, SessionCommand::RemoveBookmark { page: 3 });
        assert_eq!(command.nav_action(), Some(NavAction::RemoveBookmark(3)));
    }
}
