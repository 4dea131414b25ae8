use super::super::state::App;
use super::Effect;
use flipbook_core::{NavAction, SessionEffect};
use std::time::Instant;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_nav(&mut self, action: NavAction, effects: &mut Vec<Effect>) {
        if !self.session.has_book() && !Self::allowed_without_book(action) {
            return;
        }
        let now = Instant::now();
        let session_effects = self.session.dispatch(action);
        // Viewport fitting is transient; only explicit zoom becomes the saved scale.
        let persist_scale = matches!(
            action,
            NavAction::ZoomIn | NavAction::ZoomOut | NavAction::SetScale(_)
        );
        self.apply_session_effects(session_effects, now, persist_scale, effects);
    }

    /// Panels and window mode stay usable on the empty start screen.
    fn allowed_without_book(action: NavAction) -> bool {
        matches!(
            action,
            NavAction::ToggleLibrary | NavAction::CloseAllPanels | NavAction::ToggleFullscreen
        )
    }

    /// Translate engine effects into animation updates and runtime effects.
    pub(super) fn apply_session_effects(
        &mut self,
        session_effects: Vec<SessionEffect>,
        now: Instant,
        persist_scale: bool,
        effects: &mut Vec<Effect>,
    ) {
        for effect in session_effects {
            match effect {
                SessionEffect::BookLoaded { total_pages } => {
                    debug!(total_pages, "Session reported book load");
                }
                SessionEffect::PositionChanged { position } => {
                    self.frame_at = now;
                    self.flip.retarget(
                        self.session.total_sheets(),
                        self.session.current_sheet(),
                        now,
                    );
                    info!(
                        position,
                        label = %flipbook_core::session::page_label(
                            position,
                            self.session.navigation().total_pages()
                        ),
                        "Turned to spread"
                    );
                    effects.push(Effect::SavePosition);
                }
                SessionEffect::ScaleChanged { scale } => {
                    debug!(scale, persist_scale, "Scale changed");
                    if persist_scale {
                        self.config.default_scale = scale;
                        effects.push(Effect::SaveConfig);
                    }
                }
                SessionEffect::PanelsChanged { panels } => {
                    if panels.show_library {
                        self.refresh_recent_books();
                    }
                    debug!(?panels, "Panels changed");
                }
                SessionEffect::FullscreenChanged { fullscreen } => {
                    effects.push(Effect::SetFullscreen(fullscreen));
                }
                SessionEffect::BookmarksChanged => {
                    debug!(
                        bookmarks = self.session.bookmarks().len(),
                        "Bookmarks changed"
                    );
                }
            }
        }
    }

    pub(super) fn handle_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        self.frame_at = now;
        let session_effects = self.session.poll_deferred(now);
        self.apply_session_effects(session_effects, now, false, effects);
    }

    pub(super) fn handle_cursor_moved(&mut self, x: f32) {
        self.pointer.cursor_x = Some(x);
    }

    pub(super) fn handle_pointer_pressed(&mut self) {
        if let Some(x) = self.pointer.cursor_x {
            self.swipe.begin(x);
        }
    }

    pub(super) fn handle_pointer_released(&mut self, effects: &mut Vec<Effect>) {
        match self.pointer.cursor_x {
            Some(x) => self.handle_swipe_ended(x, effects),
            None => self.swipe.cancel(),
        }
    }

    pub(super) fn handle_swipe_started(&mut self, x: f32) {
        self.pointer.cursor_x = Some(x);
        self.swipe.begin(x);
    }

    pub(super) fn handle_swipe_ended(&mut self, x: f32, effects: &mut Vec<Effect>) {
        if let Some(action) = self.swipe.end(x) {
            debug!(?action, "Swipe recognized");
            self.handle_nav(action, effects);
        }
    }

    pub(super) fn handle_swipe_cancelled(&mut self) {
        self.swipe.cancel();
    }
}
