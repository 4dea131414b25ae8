use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use tracing::info;

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::Nav(action) => self.handle_nav(action, &mut effects),
            Message::ToggleTheme => self.handle_toggle_theme(&mut effects),
            Message::OpenPathInputChanged(input) => self.handle_open_path_input_changed(input),
            Message::OpenPathRequested => self.handle_open_path_requested(&mut effects),
            Message::OpenRecentBook(key) => self.handle_open_recent_book(key, &mut effects),
            Message::BookLoaded {
                request_id,
                book,
                config,
                position,
            } => self.handle_book_loaded(request_id, book, config, position, &mut effects),
            Message::BookLoadFailed {
                request_id,
                source,
                error,
            } => self.handle_book_load_failed(request_id, source, error),
            Message::WindowResized { width, height } => {
                self.handle_window_resized(width, height, &mut effects);
            }
            Message::WindowMoved { x, y } => {
                self.handle_window_moved(x, y, &mut effects);
            }
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::CursorMoved { x } => self.handle_cursor_moved(x),
            Message::PointerPressed => self.handle_pointer_pressed(),
            Message::PointerReleased => self.handle_pointer_released(&mut effects),
            Message::SwipeStarted { x } => self.handle_swipe_started(x),
            Message::SwipeEnded { x } => self.handle_swipe_ended(x, &mut effects),
            Message::SwipeCancelled => self.handle_swipe_cancelled(),
            Message::SafeQuit => effects.push(Effect::QuitSafely),
            Message::PollSystemSignals => {
                if crate::take_sigint_requested() {
                    info!("SIGINT received; running safe quit");
                    effects.push(Effect::QuitSafely);
                }
            }
            Message::Tick(now) => self.handle_tick(now, &mut effects),
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book_loader::LoadedBook;
    use crate::config::AppConfig;
    use flipbook_core::{MemoryBookmarkStore, NavAction};
    use std::time::{Duration, Instant};

    fn sample_book(pages: usize) -> LoadedBook {
        LoadedBook {
            key: "/books/sample".to_string(),
            title: "Sample".to_string(),
            pages: (1..=pages).map(|n| format!("/books/sample/{n}.png")).collect(),
        }
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.cache_dir = std::env::temp_dir()
            .join("flipbook-viewer-tests")
            .display()
            .to_string();
        config
    }

    fn build_test_app(pages: usize) -> App {
        build_test_app_with(pages, test_config())
    }

    fn build_test_app_with(pages: usize, config: AppConfig) -> App {
        let store = MemoryBookmarkStore::new().with_book("/books/sample", [2]);
        let mut app = App::with_store(config.clone(), Box::new(store));
        let effects = app.request_book(vec!["/books/sample".to_string()]);
        assert_eq!(effects.len(), 1);
        let request_id = app.loader.request_id;
        app.reduce(Message::BookLoaded {
            request_id,
            book: sample_book(pages),
            config,
            position: None,
        });
        app
    }

    #[test]
    fn next_page_persists_position_and_starts_flip() {
        let mut app = build_test_app(5);
        let effects = app.reduce(Message::Nav(NavAction::Next));
        assert!(matches!(effects.as_slice(), [Effect::SavePosition]));
        assert_eq!(app.session.current_position(), 2);
        assert!(app.flip.is_animating(app.frame_at));
    }

    #[test]
    fn prev_on_first_spread_does_nothing() {
        let mut app = build_test_app(5);
        let effects = app.reduce(Message::Nav(NavAction::Prev));
        assert!(effects.is_empty());
        assert!(!app.flip.is_animating(app.frame_at));
    }

    #[test]
    fn loaded_book_restores_bookmarks_and_position() {
        let mut app = build_test_app(0);
        let request_id = app.loader.request_id + 1;
        app.loader.request_id = request_id;
        app.reduce(Message::BookLoaded {
            request_id,
            book: sample_book(12),
            config: AppConfig::default(),
            position: Some(7),
        });
        assert_eq!(app.session.current_position(), 6);
        assert!(app.session.bookmarks().contains(2));
        assert!(!app.loader.loading);
        assert!(!app.flip.is_animating(app.frame_at));
    }

    #[test]
    fn stale_book_load_is_discarded() {
        let mut app = build_test_app(5);
        app.request_book(vec!["/books/newer".to_string()]);
        let stale_id = app.loader.request_id - 1;
        let effects = app.reduce(Message::BookLoaded {
            request_id: stale_id,
            book: LoadedBook {
                key: "/books/old".to_string(),
                title: "Old".to_string(),
                pages: vec!["/books/old/1.png".to_string()],
            },
            config: AppConfig::default(),
            position: None,
        });
        assert!(effects.is_empty());
        assert_eq!(app.session.title(), "Sample");
        assert!(app.loader.loading);
    }

    #[test]
    fn newer_request_cancels_the_previous_load() {
        let mut app = build_test_app(5);
        app.request_book(vec!["/books/first".to_string()]);
        let first = app.loader.token.clone().expect("token");
        app.request_book(vec!["/books/second".to_string()]);
        assert!(first.is_cancelled());
    }

    #[test]
    fn load_failure_keeps_previous_book_open() {
        let mut app = build_test_app(5);
        app.request_book(vec!["/books/broken".to_string()]);
        let request_id = app.loader.request_id;
        app.reduce(Message::BookLoadFailed {
            request_id,
            source: "/books/broken".to_string(),
            error: "no images found".to_string(),
        });
        assert!(!app.loader.loading);
        assert!(app.loader.error.as_deref().is_some_and(|e| e.contains("no images")));
        assert_eq!(app.session.title(), "Sample");
    }

    #[test]
    fn fullscreen_toggle_requests_window_mode_change() {
        let mut app = build_test_app(5);
        let effects = app.reduce(Message::Nav(NavAction::ToggleFullscreen));
        assert!(matches!(effects.as_slice(), [Effect::SetFullscreen(true)]));
    }

    #[test]
    fn resize_settles_scale_after_quiet_period() {
        let mut app = build_test_app(5);
        let effects = app.reduce(Message::WindowResized {
            width: 500.0,
            height: 700.0,
        });
        assert!(matches!(effects.as_slice(), [Effect::SaveConfig]));
        assert!(app.session.resize_pending());

        let later = Instant::now() + Duration::from_secs(1);
        let effects = app.reduce(Message::Tick(later));
        assert!(effects.is_empty());
        assert_eq!(app.session.navigation().scale(), 0.6);
        assert_eq!(app.config.default_scale, 1.0);
        assert!(!app.session.resize_pending());
    }

    #[test]
    fn book_opened_in_narrow_window_uses_narrow_tier() {
        let mut config = test_config();
        config.window_width = 600.0;
        let app = build_test_app_with(5, config);
        assert_eq!(app.session.navigation().scale(), 0.6);
        assert_eq!(app.config.default_scale, 1.0);
    }

    #[test]
    fn narrow_resize_keeps_the_saved_zoom() {
        let mut app = build_test_app(5);
        let effects = app.reduce(Message::Nav(NavAction::SetScale(1.5)));
        assert!(matches!(effects.as_slice(), [Effect::SaveConfig]));
        assert_eq!(app.config.default_scale, 1.5);

        app.reduce(Message::WindowResized {
            width: 500.0,
            height: 700.0,
        });
        app.reduce(Message::Tick(Instant::now() + Duration::from_secs(1)));
        assert_eq!(app.session.navigation().scale(), 0.6);
        assert_eq!(app.config.default_scale, 1.5);

        // Reopen the book in a wide window with the config that was saved.
        app.config.window_width = 1400.0;
        let saved = app.config.clone();
        let request_id = app.loader.request_id + 1;
        app.loader.request_id = request_id;
        app.reduce(Message::BookLoaded {
            request_id,
            book: sample_book(5),
            config: saved,
            position: None,
        });
        assert_eq!(app.session.navigation().scale(), 1.5);
    }

    #[test]
    fn zoom_buttons_persist_the_new_scale() {
        let mut app = build_test_app(5);
        let effects = app.reduce(Message::Nav(NavAction::ZoomIn));
        assert!(matches!(effects.as_slice(), [Effect::SaveConfig]));
        assert_eq!(app.config.default_scale, 1.1);
    }

    #[test]
    fn leftward_drag_turns_forward() {
        let mut app = build_test_app(5);
        app.reduce(Message::CursorMoved { x: 600.0 });
        app.reduce(Message::PointerPressed);
        app.reduce(Message::CursorMoved { x: 480.0 });
        let effects = app.reduce(Message::PointerReleased);
        assert!(matches!(effects.as_slice(), [Effect::SavePosition]));
        assert_eq!(app.session.current_position(), 2);
    }

    #[test]
    fn short_touch_drag_is_ignored() {
        let mut app = build_test_app(5);
        app.reduce(Message::SwipeStarted { x: 300.0 });
        let effects = app.reduce(Message::SwipeEnded { x: 280.0 });
        assert!(effects.is_empty());
        assert_eq!(app.session.current_position(), 0);
    }

    #[test]
    fn page_actions_are_ignored_without_a_book() {
        let config = AppConfig::default();
        let mut app = App::with_store(config, Box::new(MemoryBookmarkStore::new()));
        assert!(app.reduce(Message::Nav(NavAction::ZoomIn)).is_empty());
        app.reduce(Message::Nav(NavAction::ToggleLibrary));
        assert!(app.session.navigation().panels().show_library);
    }

    #[test]
    fn safe_quit_shortcut_emits_quit_effect() {
        let mut app = build_test_app(5);
        let effects = app.reduce(Message::KeyPressed {
            key: iced::keyboard::Key::Character("q".into()),
            modifiers: iced::keyboard::Modifiers::default(),
        });
        assert!(matches!(effects.as_slice(), [Effect::QuitSafely]));
    }
}
