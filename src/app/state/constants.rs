use std::time::Duration;

/// Width of one page at scale 1.0, in logical pixels.
pub(crate) const BASE_PAGE_WIDTH: f32 = 420.0;
/// Page height over page width.
pub(crate) const PAGE_ASPECT_RATIO: f32 = 1.414;
pub(crate) const FRAME_INTERVAL: Duration = Duration::from_millis(16);
pub(crate) const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub(crate) const RECENT_DISPLAY_LIMIT: usize = 12;
pub(crate) const TOOLBAR_SPACING: f32 = 8.0;
pub(crate) const PANEL_WIDTH: f32 = 260.0;
