use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Flat runtime configuration. Per-book overrides are stored in this shape;
/// the user-facing file uses the tabled layout in `tables.rs`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_scale")]
    pub default_scale: f32,
    #[serde(default = "crate::config::defaults::default_thumbnail_width")]
    pub thumbnail_width: f32,
    #[serde(default = "crate::config::defaults::default_show_page_numbers")]
    pub show_page_numbers: bool,
    #[serde(default = "crate::config::defaults::default_flip_duration_ms")]
    pub flip_duration_ms: u64,
    #[serde(default = "crate::config::defaults::default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    #[serde(default = "crate::config::defaults::default_swipe_threshold")]
    pub swipe_threshold: f32,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default)]
    pub window_pos_x: Option<f32>,
    #[serde(default)]
    pub window_pos_y: Option<f32>,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_key_next")]
    pub key_next: String,
    #[serde(default = "crate::config::defaults::default_key_prev")]
    pub key_prev: String,
    #[serde(default = "crate::config::defaults::default_key_close_panels")]
    pub key_close_panels: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_bookmark")]
    pub key_toggle_bookmark: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_thumbnails")]
    pub key_toggle_thumbnails: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_bookmarks")]
    pub key_toggle_bookmarks: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_library")]
    pub key_toggle_library: String,
    #[serde(default = "crate::config::defaults::default_key_zoom_in")]
    pub key_zoom_in: String,
    #[serde(default = "crate::config::defaults::default_key_zoom_out")]
    pub key_zoom_out: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_fullscreen")]
    pub key_toggle_fullscreen: String,
    #[serde(default = "crate::config::defaults::default_key_safe_quit")]
    pub key_safe_quit: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        use crate::config::defaults;
        AppConfig {
            theme: ThemeMode::default(),
            default_scale: defaults::default_scale(),
            thumbnail_width: defaults::default_thumbnail_width(),
            show_page_numbers: defaults::default_show_page_numbers(),
            flip_duration_ms: defaults::default_flip_duration_ms(),
            resize_debounce_ms: defaults::default_resize_debounce_ms(),
            swipe_threshold: defaults::default_swipe_threshold(),
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
            window_pos_x: None,
            window_pos_y: None,
            cache_dir: defaults::default_cache_dir(),
            log_level: defaults::default_log_level(),
            key_next: defaults::default_key_next(),
            key_prev: defaults::default_key_prev(),
            key_close_panels: defaults::default_key_close_panels(),
            key_toggle_bookmark: defaults::default_key_toggle_bookmark(),
            key_toggle_thumbnails: defaults::default_key_toggle_thumbnails(),
            key_toggle_bookmarks: defaults::default_key_toggle_bookmarks(),
            key_toggle_library: defaults::default_key_toggle_library(),
            key_zoom_in: defaults::default_key_zoom_in(),
            key_zoom_out: defaults::default_key_zoom_out(),
            key_toggle_fullscreen: defaults::default_key_toggle_fullscreen(),
            key_safe_quit: defaults::default_key_safe_quit(),
        }
    }
}

impl AppConfig {
    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn cache_root(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir)
    }

    /// Keep settings that must always come from the base file when a cached
    /// per-book override is applied.
    pub fn with_base_overrides(mut self, base: &AppConfig) -> Self {
        self.log_level = base.log_level;
        self.cache_dir = base.cache_dir.clone();
        self.key_next = base.key_next.clone();
        self.key_prev = base.key_prev.clone();
        self.key_close_panels = base.key_close_panels.clone();
        self.key_toggle_bookmark = base.key_toggle_bookmark.clone();
        self.key_toggle_thumbnails = base.key_toggle_thumbnails.clone();
        self.key_toggle_bookmarks = base.key_toggle_bookmarks.clone();
        self.key_toggle_library = base.key_toggle_library.clone();
        self.key_zoom_in = base.key_zoom_in.clone();
        self.key_zoom_out = base.key_zoom_out.clone();
        self.key_toggle_fullscreen = base.key_toggle_fullscreen.clone();
        self.key_safe_quit = base.key_safe_quit.clone();
        self
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    #[default]
    Night,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Day,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}
