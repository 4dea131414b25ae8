use super::super::super::messages::Message;
use super::super::super::state::App;
use flipbook_core::NavAction;
use iced::keyboard::{Key, Modifiers, key};

impl App {
    pub(super) fn shortcut_message_for_key(
        &self,
        key: Key,
        modifiers: Modifiers,
    ) -> Option<Message> {
        let pressed = match key.as_ref() {
            Key::Named(key::Named::ArrowRight) => "right".to_string(),
            Key::Named(key::Named::ArrowLeft) => "left".to_string(),
            Key::Named(key::Named::Escape) => "escape".to_string(),
            Key::Named(key::Named::Space) => "space".to_string(),
            Key::Named(key::Named::PageDown) => "pagedown".to_string(),
            Key::Named(key::Named::PageUp) => "pageup".to_string(),
            // `=` shares a key with `+` on most layouts.
            Key::Character("=") => "+".to_string(),
            Key::Character(ch) => ch.to_lowercase(),
            _ => return None,
        };

        let config = &self.config;
        let bindings = [
            (&config.key_next, "right", Message::Nav(NavAction::Next)),
            (&config.key_prev, "left", Message::Nav(NavAction::Prev)),
            (
                &config.key_close_panels,
                "escape",
                Message::Nav(NavAction::CloseAllPanels),
            ),
            (
                &config.key_toggle_bookmarks,
                "ctrl+b",
                Message::Nav(NavAction::ToggleBookmarksList),
            ),
            (
                &config.key_toggle_bookmark,
                "b",
                Message::Nav(NavAction::ToggleBookmarkCurrent),
            ),
            (
                &config.key_toggle_thumbnails,
                "t",
                Message::Nav(NavAction::ToggleThumbnails),
            ),
            (
                &config.key_toggle_library,
                "l",
                Message::Nav(NavAction::ToggleLibrary),
            ),
            (&config.key_zoom_in, "+", Message::Nav(NavAction::ZoomIn)),
            (&config.key_zoom_out, "-", Message::Nav(NavAction::ZoomOut)),
            (
                &config.key_toggle_fullscreen,
                "f",
                Message::Nav(NavAction::ToggleFullscreen),
            ),
            (&config.key_safe_quit, "q", Message::SafeQuit),
        ];

        bindings
            .into_iter()
            .find(|(raw, fallback, _)| Self::shortcut_matches(raw, fallback, &pressed, modifiers))
            .map(|(_, _, message)| message)
    }

    /// Shift is only checked when the binding asks for it, so `b` and `B`
    /// trigger the same shortcut and `+` works on layouts needing shift.
    pub(super) fn shortcut_matches(
        raw: &str,
        fallback: &str,
        pressed: &str,
        modifiers: Modifiers,
    ) -> bool {
        let normalized = Self::normalize_shortcut_token(raw, fallback);

        let mut required_ctrl = false;
        let mut required_alt = false;
        let mut required_logo = false;
        let mut required_shift = false;
        let mut required_key: Option<&str> = None;

        for token in Self::shortcut_tokens(&normalized) {
            match token {
                "ctrl" | "control" => required_ctrl = true,
                "alt" => required_alt = true,
                "logo" | "meta" | "super" | "cmd" | "command" => required_logo = true,
                "shift" => required_shift = true,
                key => required_key = Some(key),
            }
        }

        let required_key = required_key.unwrap_or(fallback);
        if pressed != required_key {
            return false;
        }

        modifiers.control() == required_ctrl
            && modifiers.alt() == required_alt
            && modifiers.logo() == required_logo
            && (!required_shift || modifiers.shift())
    }

    /// Split on `+`, keeping a trailing `+` as the key itself (`ctrl++`).
    fn shortcut_tokens(normalized: &str) -> Vec<&str> {
        if normalized == "+" {
            return vec!["+"];
        }
        let (head, plus_key) = match normalized.strip_suffix("++") {
            Some(head) => (head, true),
            None => (normalized, false),
        };
        let mut tokens: Vec<&str> = head
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if plus_key {
            tokens.push("+");
        }
        tokens
    }

    pub(super) fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return fallback.to_string();
        }
        match normalized.as_str() {
            "arrowright" => "right".to_string(),
            "arrowleft" => "left".to_string(),
            "esc" => "escape".to_string(),
            "plus" => "+".to_string(),
            "minus" => "-".to_string(),
            _ => normalized.replace("spacebar", "space"),
        }
    }
}
