use crate::book_loader::LoadedBook;
use crate::config::AppConfig;
use flipbook_core::NavAction;
use iced::keyboard::{Key, Modifiers};
use std::time::Instant;

/// Messages emitted by the UI.
#[derive(Debug, Clone)]
pub enum Message {
    Nav(NavAction),
    ToggleTheme,
    OpenPathInputChanged(String),
    OpenPathRequested,
    OpenRecentBook(String),
    BookLoaded {
        request_id: u64,
        book: LoadedBook,
        config: AppConfig,
        position: Option<usize>,
    },
    BookLoadFailed {
        request_id: u64,
        source: String,
        error: String,
    },
    WindowResized {
        width: f32,
        height: f32,
    },
    WindowMoved {
        x: f32,
        y: f32,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    CursorMoved {
        x: f32,
    },
    PointerPressed,
    PointerReleased,
    SwipeStarted {
        x: f32,
    },
    SwipeEnded {
        x: f32,
    },
    SwipeCancelled,
    SafeQuit,
    PollSystemSignals,
    Tick(Instant),
}
