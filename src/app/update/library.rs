use super::super::state::App;
use super::Effect;
use crate::book_loader::{LoadToken, LoadedBook, is_remote, sources_from_key};
use crate::config::AppConfig;
use std::path::Path;
use tracing::{debug, info, warn};

impl App {
    /// Start loading `sources`, superseding any load still in flight.
    pub(in crate::app) fn request_book(&mut self, sources: Vec<String>) -> Vec<Effect> {
        let sources: Vec<String> = sources
            .into_iter()
            .map(|source| source.trim().to_string())
            .filter(|source| !source.is_empty())
            .collect();
        if sources.is_empty() {
            return Vec::new();
        }
        if let Some(previous) = self.loader.token.take() {
            debug!(request_id = self.loader.request_id, "Cancelling superseded book load");
            previous.cancel();
        }
        self.loader.request_id = self.loader.request_id.wrapping_add(1);
        let token = LoadToken::new();
        self.loader.token = Some(token.clone());
        self.loader.loading = true;
        self.loader.error = None;
        self.loader.pending_source = Some(sources.join(", "));
        info!(
            request_id = self.loader.request_id,
            sources = sources.len(),
            "Requested book load"
        );
        vec![Effect::LoadBook {
            request_id: self.loader.request_id,
            sources,
            token,
        }]
    }

    pub(super) fn handle_open_path_input_changed(&mut self, input: String) {
        self.library.open_path_input = input;
    }

    pub(super) fn handle_open_path_requested(&mut self, effects: &mut Vec<Effect>) {
        let candidate = self.library.open_path_input.trim().to_string();
        if candidate.is_empty() {
            return;
        }
        if !is_remote(&candidate) && !Path::new(&candidate).exists() {
            self.loader.error = Some(format!("File not found: {candidate}"));
            return;
        }
        info!(source = %candidate, "Opening path from library input");
        effects.extend(self.request_book(vec![candidate]));
    }

    pub(super) fn handle_open_recent_book(&mut self, key: String, effects: &mut Vec<Effect>) {
        info!(%key, "Opening recent book");
        effects.extend(self.request_book(sources_from_key(&key)));
    }

    pub(super) fn handle_book_loaded(
        &mut self,
        request_id: u64,
        book: LoadedBook,
        config: AppConfig,
        position: Option<usize>,
        effects: &mut Vec<Effect>,
    ) {
        if request_id != self.loader.request_id {
            debug!(request_id, current = self.loader.request_id, "Dropping stale book load");
            return;
        }
        self.loader.loading = false;
        self.loader.token = None;
        self.loader.pending_source = None;
        let title = book.title.clone();
        match self.apply_loaded_book(book, config, position) {
            Ok(session_effects) => {
                // Sheets already rest at the restored spread, so retargeting is a no-op.
                self.apply_session_effects(session_effects, self.frame_at, false, effects);
                self.library.open_path_input.clear();
                self.refresh_recent_books();
                info!(%title, "Book loaded in-process");
            }
            Err(err) => {
                self.loader.error = Some(format!("Failed to open {title}: {err:#}"));
                warn!(%title, "Loaded book was rejected: {err:#}");
            }
        }
    }

    pub(super) fn handle_book_load_failed(&mut self, request_id: u64, source: String, error: String) {
        if request_id != self.loader.request_id {
            debug!(request_id, "Dropping stale book load failure");
            return;
        }
        self.loader.loading = false;
        self.loader.token = None;
        self.loader.pending_source = None;
        self.loader.error = Some(format!("Failed to open {source}: {error}"));
        warn!(%source, "Failed to load book in-process: {error}");
    }
}
