//! Entry point for the flipbook viewer.
//!
//! Parses the command line, loads `conf/config.toml`, then either launches
//! the GUI or prints the initial reader snapshot for a book as JSON.

mod app;
mod book_loader;
mod cache;
mod config;
mod rasterize;
mod theme;

use crate::app::run_app;
use crate::book_loader::{LoadToken, load_book};
use crate::cache::{effective_book_config, load_position, remember_book};
use crate::config::{DEFAULT_CONFIG_PATH, load_config};
use anyhow::{Context, Result, anyhow};
use flipbook_core::{
    BookSource, FileBookmarkStore, NavAction, ReaderSession, page::pages_from_sources,
};
use std::env;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

const USAGE: &str = "Usage: flipbook-viewer [--print-snapshot] [<folder> | <file.pdf> | <book.toml> | <image-or-url>...]";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    sources: Vec<String>,
    print_snapshot: bool,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = load_config(Path::new(DEFAULT_CONFIG_PATH));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        sources = args.sources.len(),
        level = %config.log_level,
        cache = %config.cache_root().display(),
        "Starting flipbook viewer"
    );

    if args.print_snapshot {
        return print_snapshot(&config, &args.sources);
    }

    install_sigint_handler();
    run_app(config, args.sources).context("Failed to start the GUI")?;
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    for arg in args {
        match arg.as_str() {
            "--print-snapshot" => parsed.print_snapshot = true,
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            flag if flag.starts_with("--") => {
                return Err(anyhow!("Unknown option {flag}\n{USAGE}"));
            }
            _ => parsed.sources.push(arg),
        }
    }
    if parsed.print_snapshot && parsed.sources.is_empty() {
        return Err(anyhow!("--print-snapshot needs a book to open\n{USAGE}"));
    }
    Ok(parsed)
}

/// Resolve a book without a window and print what the reader would show.
fn print_snapshot(config: &config::AppConfig, sources: &[String]) -> Result<()> {
    let cache_root = config.cache_root();
    let book = load_book(sources, &cache_root, &LoadToken::new())?;
    remember_book(&cache_root, &book.key, &book.title, book.pages.len());
    let book_config = effective_book_config(config, &book.key);
    let position = load_position(&cache_root, &book.key);

    let mut session = ReaderSession::with_scale(
        Box::new(FileBookmarkStore::new(cache_root)),
        book_config.default_scale,
    );
    session.load_book(BookSource {
        key: book.key,
        title: book.title,
        pages: pages_from_sources(book.pages),
    })?;
    session.dispatch(NavAction::SetScale(book_config.default_scale));
    session.dispatch(NavAction::FitViewport {
        width: book_config.window_width,
    });
    if let Some(position) = position {
        session.dispatch(NavAction::JumpTo(position));
    }

    let json = serde_json::to_string_pretty(&session.snapshot())
        .context("Failed to serialize reader snapshot")?;
    println!("{json}");
    Ok(())
}

fn install_sigint_handler() {
    if let Err(err) = ctrlc::set_handler(|| SIGINT_REQUESTED.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl+C handler: {err}");
    }
}

/// Returns true once per Ctrl+C press.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::SeqCst)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
