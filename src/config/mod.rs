//! Configuration loading for the flipbook viewer.
//!
//! All user-tunable settings are loaded from `conf/config.toml` if present.
//! Missing or invalid entries fall back to defaults so the viewer can still
//! launch.

mod defaults;
mod io;
mod models;
mod tables;

/// Base configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

pub use io::{clamp_config, load_config, parse_config, serialize_config};
pub use models::{AppConfig, LogLevel, ThemeMode};
