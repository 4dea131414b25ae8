use flipbook_core::flip::DEFAULT_FLIP_DURATION;
use flipbook_core::input::DEFAULT_SWIPE_THRESHOLD;
use flipbook_core::navigation::DEFAULT_SCALE;
use flipbook_core::scale::DEFAULT_RESIZE_DEBOUNCE;

pub(crate) fn default_scale() -> f32 {
    DEFAULT_SCALE
}

pub(crate) fn default_thumbnail_width() -> f32 {
    120.0
}

pub(crate) fn default_show_page_numbers() -> bool {
    true
}

pub(crate) fn default_flip_duration_ms() -> u64 {
    DEFAULT_FLIP_DURATION.as_millis() as u64
}

pub(crate) fn default_resize_debounce_ms() -> u64 {
    DEFAULT_RESIZE_DEBOUNCE.as_millis() as u64
}

pub(crate) fn default_swipe_threshold() -> f32 {
    DEFAULT_SWIPE_THRESHOLD
}

pub(crate) fn default_window_width() -> f32 {
    1280.0
}

pub(crate) fn default_window_height() -> f32 {
    860.0
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}

pub(crate) fn default_key_next() -> String {
    "right".to_string()
}

pub(crate) fn default_key_prev() -> String {
    "left".to_string()
}

pub(crate) fn default_key_close_panels() -> String {
    "escape".to_string()
}

pub(crate) fn default_key_toggle_bookmark() -> String {
    "b".to_string()
}

pub(crate) fn default_key_toggle_thumbnails() -> String {
    "t".to_string()
}

pub(crate) fn default_key_toggle_bookmarks() -> String {
    "ctrl+b".to_string()
}

pub(crate) fn default_key_toggle_library() -> String {
    "l".to_string()
}

pub(crate) fn default_key_zoom_in() -> String {
    "+".to_string()
}

pub(crate) fn default_key_zoom_out() -> String {
    "-".to_string()
}

pub(crate) fn default_key_toggle_fullscreen() -> String {
    "f".to_string()
}

pub(crate) fn default_key_safe_quit() -> String {
    "q".to_string()
}
