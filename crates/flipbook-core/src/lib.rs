//! Page-flip rendering and navigation engine for a flipbook reader.
//!
//! The engine is synchronous and GUI-agnostic. A [`ReaderSession`] owns the
//! navigation state and bookmark ledger of one open book; front-ends feed it
//! [`NavAction`]s and render the sheets it derives, animating them with a
//! [`FlipDriver`].

pub mod bindings;
pub mod bookmarks;
pub mod debounce;
pub mod flip;
pub mod input;
pub mod navigation;
pub mod page;
pub mod scale;
pub mod session;
pub mod sheet;
pub mod store;

pub use bookmarks::{BookmarkLedger, BookmarkOp};
pub use flip::{Face, FlipDriver, FlipTiming, SheetPose};
pub use navigation::{NavAction, NavOutcome, NavigationState, PanelState};
pub use page::{Page, PageKind};
pub use session::{
    BookSource, ReaderSession, ReaderSnapshot, SessionCommand, SessionEffect, SessionEvent,
};
pub use sheet::Sheet;
pub use store::{BookmarkStore, FileBookmarkStore, MemoryBookmarkStore};
