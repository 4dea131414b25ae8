use super::defaults;
use super::models::{AppConfig, LogLevel, ThemeMode};
use serde::{Deserialize, Serialize};

/// On-disk layout of `conf/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    reading: ReadingConfig,
    #[serde(default)]
    ui: UiConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    keys: KeyConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            theme: tables.appearance.theme,
            default_scale: tables.appearance.default_scale,
            thumbnail_width: tables.appearance.thumbnail_width,
            show_page_numbers: tables.appearance.show_page_numbers,
            flip_duration_ms: tables.reading.flip_duration_ms,
            resize_debounce_ms: tables.reading.resize_debounce_ms,
            swipe_threshold: tables.reading.swipe_threshold,
            window_width: tables.ui.window_width,
            window_height: tables.ui.window_height,
            window_pos_x: tables.ui.window_pos_x,
            window_pos_y: tables.ui.window_pos_y,
            cache_dir: tables.ui.cache_dir,
            log_level: tables.logging.log_level,
            key_next: tables.keys.next,
            key_prev: tables.keys.prev,
            key_close_panels: tables.keys.close_panels,
            key_toggle_bookmark: tables.keys.toggle_bookmark,
            key_toggle_thumbnails: tables.keys.toggle_thumbnails,
            key_toggle_bookmarks: tables.keys.toggle_bookmarks,
            key_toggle_library: tables.keys.toggle_library,
            key_zoom_in: tables.keys.zoom_in,
            key_zoom_out: tables.keys.zoom_out,
            key_toggle_fullscreen: tables.keys.toggle_fullscreen,
            key_safe_quit: tables.keys.safe_quit,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            appearance: AppearanceConfig {
                theme: config.theme,
                default_scale: config.default_scale,
                thumbnail_width: config.thumbnail_width,
                show_page_numbers: config.show_page_numbers,
            },
            reading: ReadingConfig {
                flip_duration_ms: config.flip_duration_ms,
                resize_debounce_ms: config.resize_debounce_ms,
                swipe_threshold: config.swipe_threshold,
            },
            ui: UiConfig {
                window_width: config.window_width,
                window_height: config.window_height,
                window_pos_x: config.window_pos_x,
                window_pos_y: config.window_pos_y,
                cache_dir: config.cache_dir.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            keys: KeyConfig {
                next: config.key_next.clone(),
                prev: config.key_prev.clone(),
                close_panels: config.key_close_panels.clone(),
                toggle_bookmark: config.key_toggle_bookmark.clone(),
                toggle_thumbnails: config.key_toggle_thumbnails.clone(),
                toggle_bookmarks: config.key_toggle_bookmarks.clone(),
                toggle_library: config.key_toggle_library.clone(),
                zoom_in: config.key_zoom_in.clone(),
                zoom_out: config.key_zoom_out.clone(),
                toggle_fullscreen: config.key_toggle_fullscreen.clone(),
                safe_quit: config.key_safe_quit.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct AppearanceConfig {
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default = "defaults::default_scale")]
    default_scale: f32,
    #[serde(default = "defaults::default_thumbnail_width")]
    thumbnail_width: f32,
    #[serde(default = "defaults::default_show_page_numbers")]
    show_page_numbers: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            theme: ThemeMode::default(),
            default_scale: defaults::default_scale(),
            thumbnail_width: defaults::default_thumbnail_width(),
            show_page_numbers: defaults::default_show_page_numbers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReadingConfig {
    #[serde(default = "defaults::default_flip_duration_ms")]
    flip_duration_ms: u64,
    #[serde(default = "defaults::default_resize_debounce_ms")]
    resize_debounce_ms: u64,
    #[serde(default = "defaults::default_swipe_threshold")]
    swipe_threshold: f32,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        ReadingConfig {
            flip_duration_ms: defaults::default_flip_duration_ms(),
            resize_debounce_ms: defaults::default_resize_debounce_ms(),
            swipe_threshold: defaults::default_swipe_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct UiConfig {
    #[serde(default = "defaults::default_window_width")]
    window_width: f32,
    #[serde(default = "defaults::default_window_height")]
    window_height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    window_pos_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    window_pos_y: Option<f32>,
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
            window_pos_x: None,
            window_pos_y: None,
            cache_dir: defaults::default_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct KeyConfig {
    #[serde(default = "defaults::default_key_next")]
    next: String,
    #[serde(default = "defaults::default_key_prev")]
    prev: String,
    #[serde(default = "defaults::default_key_close_panels")]
    close_panels: String,
    #[serde(default = "defaults::default_key_toggle_bookmark")]
    toggle_bookmark: String,
    #[serde(default = "defaults::default_key_toggle_thumbnails")]
    toggle_thumbnails: String,
    #[serde(default = "defaults::default_key_toggle_bookmarks")]
    toggle_bookmarks: String,
    #[serde(default = "defaults::default_key_toggle_library")]
    toggle_library: String,
    #[serde(default = "defaults::default_key_zoom_in")]
    zoom_in: String,
    #[serde(default = "defaults::default_key_zoom_out")]
    zoom_out: String,
    #[serde(default = "defaults::default_key_toggle_fullscreen")]
    toggle_fullscreen: String,
    #[serde(default = "defaults::default_key_safe_quit")]
    safe_quit: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            next: defaults::default_key_next(),
            prev: defaults::default_key_prev(),
            close_panels: defaults::default_key_close_panels(),
            toggle_bookmark: defaults::default_key_toggle_bookmark(),
            toggle_thumbnails: defaults::default_key_toggle_thumbnails(),
            toggle_bookmarks: defaults::default_key_toggle_bookmarks(),
            toggle_library: defaults::default_key_toggle_library(),
            zoom_in: defaults::default_key_zoom_in(),
            zoom_out: defaults::default_key_zoom_out(),
            toggle_fullscreen: defaults::default_key_toggle_fullscreen(),
            safe_quit: defaults::default_key_safe_quit(),
        }
    }
}
