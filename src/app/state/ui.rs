use crate::book_loader::LoadToken;
use crate::cache::RecentBook;

pub struct LibraryState {
    pub(in crate::app) recent: Vec<RecentBook>,
    pub(in crate::app) open_path_input: String,
}

/// Background book load bookkeeping. Results carrying an older
/// `request_id` are stale and dropped.
#[derive(Default)]
pub struct LoaderState {
    pub(in crate::app) loading: bool,
    pub(in crate::app) error: Option<String>,
    pub(in crate::app) request_id: u64,
    pub(in crate::app) token: Option<LoadToken>,
    pub(in crate::app) pending_source: Option<String>,
}

/// Last known cursor position, used to measure mouse drags.
#[derive(Default)]
pub struct PointerState {
    pub(in crate::app) cursor_x: Option<f32>,
}
