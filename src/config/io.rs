use super::defaults;
use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use flipbook_core::navigation::clamp_scale;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load `path`, falling back to defaults when the file is missing or invalid.
pub fn load_config(path: &Path) -> AppConfig {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), "Config not readable, using defaults: {err}");
            return AppConfig::default();
        }
    };
    match parse_config(&data) {
        Ok(config) => {
            debug!(path = %path.display(), "Loaded config");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config, using defaults: {err:#}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(data: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(data).context("parsing config tables")?;
    let mut config = AppConfig::from(tables);
    clamp_config(&mut config);
    Ok(config)
}

pub fn serialize_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(&ConfigTables::from(config)).context("serializing config")
}

/// Pull every numeric setting back into its usable range.
pub fn clamp_config(config: &mut AppConfig) {
    config.default_scale = clamp_scale(config.default_scale);
    config.thumbnail_width = sanitize(config.thumbnail_width, 120.0).clamp(48.0, 320.0);
    config.flip_duration_ms = config.flip_duration_ms.min(5_000);
    config.resize_debounce_ms = config.resize_debounce_ms.clamp(16, 2_000);
    config.swipe_threshold = sanitize(config.swipe_threshold, 50.0).clamp(8.0, 400.0);
    config.window_width = sanitize(config.window_width, 1280.0).max(320.0);
    config.window_height = sanitize(config.window_height, 860.0).max(240.0);
    config.window_pos_x = config.window_pos_x.filter(|x| x.is_finite());
    config.window_pos_y = config.window_pos_y.filter(|y| y.is_finite());
    if config.cache_dir.trim().is_empty() {
        config.cache_dir = defaults::default_cache_dir();
    }
    normalize_key_bindings(config);
}

fn normalize_key_bindings(config: &mut AppConfig) {
    let bindings: [(&mut String, fn() -> String); 11] = [
        (&mut config.key_next, defaults::default_key_next),
        (&mut config.key_prev, defaults::default_key_prev),
        (&mut config.key_close_panels, defaults::default_key_close_panels),
        (&mut config.key_toggle_bookmark, defaults::default_key_toggle_bookmark),
        (&mut config.key_toggle_thumbnails, defaults::default_key_toggle_thumbnails),
        (&mut config.key_toggle_bookmarks, defaults::default_key_toggle_bookmarks),
        (&mut config.key_toggle_library, defaults::default_key_toggle_library),
        (&mut config.key_zoom_in, defaults::default_key_zoom_in),
        (&mut config.key_zoom_out, defaults::default_key_zoom_out),
        (&mut config.key_toggle_fullscreen, defaults::default_key_toggle_fullscreen),
        (&mut config.key_safe_quit, defaults::default_key_safe_quit),
    ];
    for (binding, fallback) in bindings {
        *binding = normalize_key_binding(binding, fallback);
    }
}

fn normalize_key_binding(raw: &str, fallback: fn() -> String) -> String {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        fallback()
    } else {
        normalized
    }
}

fn sanitize(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, ThemeMode};
    use flipbook_core::navigation::MAX_SCALE;

    #[test]
    fn missing_tables_fall_back_to_defaults() {
        let config = parse_config("").expect("empty config parses");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn tables_map_onto_flat_fields() {
        let config = parse_config(
            r#"
            [appearance]
            theme = "day"
            default_scale = 1.3

            [reading]
            flip_duration_ms = 450

            [logging]
            log_level = "warn"

            [keys]
            next = "l"
            "#,
        )
        .expect("parse config");
        assert_eq!(config.theme, ThemeMode::Day);
        assert_eq!(config.default_scale, 1.3);
        assert_eq!(config.flip_duration_ms, 450);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.key_next, "l");
        assert_eq!(config.key_prev, "left");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            r#"
            [appearance]
            default_scale = 9.0

            [reading]
            resize_debounce_ms = 0
            swipe_threshold = 1.0
            "#,
        )
        .expect("parse config");
        assert_eq!(config.default_scale, MAX_SCALE);
        assert_eq!(config.resize_debounce_ms, 16);
        assert_eq!(config.swipe_threshold, 8.0);
    }

    #[test]
    fn serialized_config_parses_back_to_same_values() {
        let mut config = AppConfig::default();
        config.theme = ThemeMode::Day;
        config.window_pos_x = Some(40.0);
        let text = serialize_config(&config).expect("serialize");
        assert!(text.contains("[keys]"));
        assert_eq!(parse_config(&text).expect("parse"), config);
    }

    #[test]
    fn key_bindings_are_lowercased_and_blank_ones_restored() {
        let config = parse_config(
            r#"
            [keys]
            next = "  PageDown "
            toggle_bookmark = ""
            "#,
        )
        .expect("parse config");
        assert_eq!(config.key_next, "pagedown");
        assert_eq!(config.key_toggle_bookmark, "b");
    }

    #[test]
    fn unreadable_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(&dir.path().join("missing.toml"));
        assert_eq!(config, AppConfig::default());
    }
}
