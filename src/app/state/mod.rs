mod constants;
mod ui;

use crate::book_loader::LoadedBook;
use crate::cache::{list_recent_books, save_book_config, save_position};
use crate::config::{AppConfig, ThemeMode, clamp_config};
use anyhow::Result;
use flipbook_core::page::pages_from_sources;
use flipbook_core::{
    BookSource, BookmarkStore, FileBookmarkStore, FlipDriver, FlipTiming, NavAction,
    ReaderSession, SessionEffect,
};
use flipbook_core::input::SwipeTracker;
use iced::Task;
use std::time::Instant;

use super::messages::Message;

pub(crate) use constants::*;
pub(in crate::app) use ui::{LibraryState, LoaderState, PointerState};

/// Core application state composed of sub-models.
pub struct App {
    pub(super) session: ReaderSession,
    pub(super) flip: FlipDriver,
    pub(super) swipe: SwipeTracker,
    pub(super) config: AppConfig,
    pub(super) library: LibraryState,
    pub(super) loader: LoaderState,
    pub(super) pointer: PointerState,
    /// Instant the current frame is drawn at; advanced by ticks.
    pub(super) frame_at: Instant,
}

impl App {
    pub fn title(&self) -> String {
        if self.session.has_book() {
            format!("{} - Flipbook", self.session.title())
        } else {
            "Flipbook".to_string()
        }
    }

    pub(in crate::app) fn with_store(mut config: AppConfig, store: Box<dyn BookmarkStore>) -> App {
        clamp_config(&mut config);
        let mut session = ReaderSession::with_scale(store, config.default_scale);
        session.set_resize_debounce(config.resize_debounce());
        App {
            session,
            flip: FlipDriver::new(Self::flip_timing(&config)),
            swipe: SwipeTracker::new(config.swipe_threshold),
            library: LibraryState {
                recent: list_recent_books(&config.cache_root(), RECENT_DISPLAY_LIMIT),
                open_path_input: String::new(),
            },
            loader: LoaderState::default(),
            pointer: PointerState::default(),
            config,
            frame_at: Instant::now(),
        }
    }

    pub(super) fn bootstrap(config: AppConfig, sources: Vec<String>) -> (App, Task<Message>) {
        let store = Box::new(FileBookmarkStore::new(config.cache_root()));
        let mut app = App::with_store(config, store);
        tracing::info!(
            scale = app.session.navigation().scale(),
            night_mode = matches!(app.config.theme, ThemeMode::Night),
            recent = app.library.recent.len(),
            "Initialized app state"
        );
        let effects = app.request_book(sources);
        let init_task = Task::batch(effects.into_iter().map(|effect| app.run_effect(effect)));
        (app, init_task)
    }

    fn flip_timing(config: &AppConfig) -> FlipTiming {
        FlipTiming {
            duration: config.flip_duration(),
            ..FlipTiming::default()
        }
    }

    /// Swap the freshly loaded book into the session, restoring the saved
    /// spread and zoom without animating.
    pub(super) fn apply_loaded_book(
        &mut self,
        book: LoadedBook,
        mut config: AppConfig,
        position: Option<usize>,
    ) -> Result<Vec<SessionEffect>> {
        clamp_config(&mut config);
        let source = BookSource {
            key: book.key,
            title: book.title,
            pages: pages_from_sources(book.pages),
        };
        let mut effects = self.session.load_book(source)?;

        // Window geometry belongs to the running window, not the cached book.
        config.window_width = self.config.window_width;
        config.window_height = self.config.window_height;
        config.window_pos_x = self.config.window_pos_x;
        config.window_pos_y = self.config.window_pos_y;
        self.config = config;
        self.session.set_resize_debounce(self.config.resize_debounce());
        self.flip.set_timing(Self::flip_timing(&self.config));
        self.swipe = SwipeTracker::new(self.config.swipe_threshold);

        // Saved zoom first, then the tier for the window the book opens in.
        effects.extend(
            self.session
                .dispatch(NavAction::SetScale(self.config.default_scale)),
        );
        effects.extend(self.session.dispatch(NavAction::FitViewport {
            width: self.config.window_width,
        }));
        if let Some(position) = position {
            effects.extend(self.session.dispatch(NavAction::JumpTo(position)));
        }
        self.frame_at = Instant::now();
        self.flip.reset(
            self.session.total_sheets(),
            self.session.current_sheet(),
            self.frame_at,
        );
        tracing::info!(
            title = %self.session.title(),
            pages = self.session.navigation().total_pages(),
            position = self.session.current_position(),
            scale = self.session.navigation().scale(),
            "Applied loaded book"
        );
        Ok(effects)
    }

    pub(super) fn refresh_recent_books(&mut self) {
        self.library.recent = list_recent_books(&self.config.cache_root(), RECENT_DISPLAY_LIMIT);
    }

    pub(super) fn save_book_config(&self) {
        if !self.session.has_book() {
            return;
        }
        save_book_config(&self.config.cache_root(), self.session.key(), &self.config);
    }

    pub(super) fn persist_position(&self) {
        if !self.session.has_book() {
            return;
        }
        save_position(
            &self.config.cache_root(),
            self.session.key(),
            self.session.current_position(),
        );
    }

    /// Size of a single page at the current zoom.
    pub(super) fn page_size(&self) -> (f32, f32) {
        let width = BASE_PAGE_WIDTH * self.session.navigation().scale();
        (width, width * PAGE_ASPECT_RATIO)
    }
}
