//! Swipe detection for pointer and touch drags.
//!
//! Nothing here mutates reading state; it only translates raw input into
//! [`NavAction`]s for the session to dispatch. Keyboard shortcuts are
//! configurable and matched by the front-end.

use crate::navigation::NavAction;

pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Horizontal drag tracker. A leftward drag longer than the threshold turns
/// forward, a rightward one turns back; shorter drags are ignored.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    origin: Option<f32>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(0.0),
            origin: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    pub fn begin(&mut self, x: f32) {
        self.origin = Some(x);
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }

    pub fn end(&mut self, x: f32) -> Option<NavAction> {
        let origin = self.origin.take()?;
        let delta = x - origin;
        if delta.abs() < self.threshold {
            return None;
        }
        if delta < 0.0 {
            Some(NavAction::Next)
        } else {
            Some(NavAction::Prev)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drags_are_ignored() {
        let mut swipe = SwipeTracker::default();
        swipe.begin(300.0);
        assert_eq!(swipe.end(270.0), None);
        assert!(!swipe.is_tracking());
    }

    #[test]
    fn swipe_direction_maps_to_navigation() {
        let mut swipe = SwipeTracker::default();
        swipe.begin(400.0);
        assert_eq!(swipe.end(320.0), Some(NavAction::Next));
        swipe.begin(100.0);
        assert_eq!(swipe.end(180.0), Some(NavAction::Prev));
        assert_eq!(swipe.end(0.0), None);
    }
}
