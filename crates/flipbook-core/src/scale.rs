//! Responsive scale: viewport width tiers and the resize debounce.

use crate::debounce::DeferredTask;
use std::time::{Duration, Instant};

pub const NARROW_BREAKPOINT: f32 = 768.0;
pub const MEDIUM_BREAKPOINT: f32 = 1024.0;
pub const NARROW_SCALE: f32 = 0.6;
pub const MEDIUM_SCALE: f32 = 0.8;
pub const WIDE_MIN_SCALE: f32 = 1.0;
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Scale for a viewport `width`. Wide viewports only ever raise the scale,
/// so a reader who zoomed in keeps their zoom.
pub fn suggested_scale(width: f32, current: f32) -> f32 {
    if width < NARROW_BREAKPOINT {
        NARROW_SCALE
    } else if width < MEDIUM_BREAKPOINT {
        MEDIUM_SCALE
    } else {
        current.max(WIDE_MIN_SCALE)
    }
}

#[derive(Debug, Clone)]
pub struct ScaleController {
    pending: DeferredTask<f32>,
}

impl Default for ScaleController {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

impl ScaleController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending: DeferredTask::new(debounce),
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.pending.set_delay(debounce);
    }

    pub fn on_resize(&mut self, width: f32, now: Instant) {
        self.pending.schedule(width, now);
    }

    /// Settled width once the viewport has been quiet for the debounce period.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        self.pending.poll(now)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.remaining(now)
    }

    pub fn teardown(&mut self) {
        self.pending.cancel();
    }
}
