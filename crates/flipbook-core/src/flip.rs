//! Flip transition driver.
//!
//! Every sheet's resting angle is a pure function of its index relative to
//! the open sheet: turned sheets rest at -180 degrees (back face up, lying
//! left), the rest lie flat at 0 degrees. The driver only adds timing on top
//! of that: when a target changes, the sheet eases from wherever it is
//! currently drawn towards the new target. Targets are recomputed from the
//! navigation position on every call, so an in-flight animation never has to
//! finish before the next navigation action is honored.

use crate::sheet::sheet_z_index;
use std::time::{Duration, Instant};

pub const FLAT_ANGLE: f32 = 0.0;
pub const FLIPPED_ANGLE: f32 = -180.0;
/// Angle at which the visible face swaps from front to back.
pub const FACE_SWAP_ANGLE: f32 = -90.0;
pub const DEFAULT_FLIP_DURATION: Duration = Duration::from_millis(700);

/// Paper-like ease: fast lift, slow settle.
pub const PAPER_EASING: CubicBezier = CubicBezier::new(0.43, 0.13, 0.23, 0.96);

pub fn target_angle(sheet_index: usize, current_sheet: usize) -> f32 {
    if sheet_index < current_sheet {
        FLIPPED_ANGLE
    } else {
        FLAT_ANGLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
}

/// The face a viewer sees at `angle`; the other face must not be drawn.
pub fn visible_face(angle: f32) -> Face {
    if angle > FACE_SWAP_ANGLE {
        Face::Front
    } else {
        Face::Back
    }
}

/// CSS-style cubic bezier easing with endpoints fixed at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    /// Eased value for linear progress in `[0, 1]`.
    pub fn ease(&self, progress: f32) -> f32 {
        if !progress.is_finite() {
            return 1.0;
        }
        let x = progress.clamp(0.0, 1.0);
        if x <= 0.0 || x >= 1.0 {
            return x;
        }
        // x(t) is monotonic for control points inside the unit square.
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        let mut t = x;
        for _ in 0..32 {
            let sampled = Self::sample(self.x1, self.x2, t);
            if (sampled - x).abs() < 1e-6 {
                break;
            }
            if sampled < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        Self::sample(self.y1, self.y2, t).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipTiming {
    pub duration: Duration,
    pub easing: CubicBezier,
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            duration: DEFAULT_FLIP_DURATION,
            easing: PAPER_EASING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetTransition {
    from: f32,
    to: f32,
    started_at: Instant,
}

impl SheetTransition {
    pub fn new(from: f32, to: f32, started_at: Instant) -> Self {
        Self {
            from,
            to,
            started_at,
        }
    }

    pub fn settled(angle: f32, now: Instant) -> Self {
        Self::new(angle, angle, now)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn angle_at(&self, timing: &FlipTiming, now: Instant) -> f32 {
        let progress = self.progress(timing, now);
        self.from + (self.to - self.from) * timing.easing.ease(progress)
    }

    pub fn is_finished(&self, timing: &FlipTiming, now: Instant) -> bool {
        self.from == self.to || self.progress(timing, now) >= 1.0
    }

    fn progress(&self, timing: &FlipTiming, now: Instant) -> f32 {
        if timing.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / timing.duration.as_secs_f32()).min(1.0)
    }
}

/// Render-ready description of one sheet at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetPose {
    pub sheet_index: usize,
    pub angle: f32,
    pub z_index: i64,
    pub face: Face,
}

#[derive(Debug, Clone)]
pub struct FlipDriver {
    timing: FlipTiming,
    transitions: Vec<SheetTransition>,
}

impl FlipDriver {
    pub fn new(timing: FlipTiming) -> Self {
        Self {
            timing,
            transitions: Vec::new(),
        }
    }

    pub fn timing(&self) -> FlipTiming {
        self.timing
    }

    pub fn set_timing(&mut self, timing: FlipTiming) {
        self.timing = timing;
    }

    /// Place every sheet at its resting angle without animating.
    pub fn reset(&mut self, total_sheets: usize, current_sheet: usize, now: Instant) {
        self.transitions = (0..total_sheets)
            .map(|idx| SheetTransition::settled(target_angle(idx, current_sheet), now))
            .collect();
    }

    /// Recompute targets for `current_sheet`. Sheets whose target changed
    /// start easing from the angle they are drawn at right now.
    pub fn retarget(&mut self, total_sheets: usize, current_sheet: usize, now: Instant) {
        if self.transitions.len() != total_sheets {
            self.reset(total_sheets, current_sheet, now);
            return;
        }
        let timing = self.timing;
        for (idx, transition) in self.transitions.iter_mut().enumerate() {
            let target = target_angle(idx, current_sheet);
            if transition.target() != target {
                let angle = transition.angle_at(&timing, now);
                *transition = SheetTransition::new(angle, target, now);
            }
        }
    }

    pub fn poses(&self, current_sheet: usize, now: Instant) -> Vec<SheetPose> {
        self.transitions
            .iter()
            .enumerate()
            .map(|(idx, transition)| {
                let angle = transition.angle_at(&self.timing, now);
                SheetPose {
                    sheet_index: idx,
                    angle,
                    z_index: sheet_z_index(idx, current_sheet),
                    face: visible_face(angle),
                }
            })
            .collect()
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transitions
            .iter()
            .any(|transition| !transition.is_finished(&self.timing, now))
    }
}

impl Default for FlipDriver {
    fn default() -> Self {
        Self::new(FlipTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn turned_sheets_rest_flipped() {
        assert_eq!(target_angle(0, 2), FLIPPED_ANGLE);
        assert_eq!(target_angle(1, 2), FLIPPED_ANGLE);
        assert_eq!(target_angle(2, 2), FLAT_ANGLE);
        assert_eq!(target_angle(3, 2), FLAT_ANGLE);
    }

    #[test]
    fn face_swaps_exactly_at_midpoint() {
        assert_eq!(visible_face(0.0), Face::Front);
        assert_eq!(visible_face(-89.9), Face::Front);
        assert_eq!(visible_face(-90.0), Face::Back);
        assert_eq!(visible_face(-180.0), Face::Back);
    }

    #[test]
    fn easing_is_monotonic_and_pinned_at_ends() {
        let mut last = 0.0;
        for step in 0..=100 {
            let value = PAPER_EASING.ease(step as f32 / 100.0);
            assert!(value >= last - 1e-5, "step={step} value={value} last={last}");
            last = value;
        }
        assert_eq!(PAPER_EASING.ease(0.0), 0.0);
        assert_eq!(PAPER_EASING.ease(1.0), 1.0);
        assert_eq!(PAPER_EASING.ease(7.0), 1.0);
    }

    #[test]
    fn transition_angle_moves_monotonically_towards_target() {
        let timing = FlipTiming::default();
        let start = Instant::now();
        let transition = SheetTransition::new(FLAT_ANGLE, FLIPPED_ANGLE, start);
        let mut last = FLAT_ANGLE;
        for step in 0..=14 {
            let angle = transition.angle_at(&timing, start + ms(step * 50));
            assert!(angle <= last + 1e-4);
            last = angle;
        }
        assert_eq!(transition.angle_at(&timing, start + ms(700)), FLIPPED_ANGLE);
        assert!(transition.is_finished(&timing, start + ms(700)));
    }

    #[test]
    fn multi_sheet_jump_animates_every_intervening_sheet() {
        let start = Instant::now();
        let mut driver = FlipDriver::default();
        driver.reset(5, 0, start);
        assert!(!driver.is_animating(start));

        driver.retarget(5, 3, start);
        let mid = start + ms(350);
        let poses = driver.poses(3, mid);
        for pose in &poses[..3] {
            assert!(pose.angle < FLAT_ANGLE && pose.angle > FLIPPED_ANGLE);
        }
        assert_eq!(poses[3].angle, FLAT_ANGLE);
        assert_eq!(poses[3].z_index, 100);
        assert!(driver.is_animating(mid));
        assert!(!driver.is_animating(start + ms(800)));
    }

    #[test]
    fn retarget_mid_flight_reverses_from_drawn_angle() {
        let start = Instant::now();
        let mut driver = FlipDriver::default();
        driver.reset(2, 0, start);
        driver.retarget(2, 1, start);

        let mid = start + ms(350);
        let drawn = driver.poses(1, mid)[0].angle;
        driver.retarget(2, 0, mid);

        let just_after = driver.poses(0, mid)[0].angle;
        assert!((just_after - drawn).abs() < 1e-3);
        let later = driver.poses(0, mid + ms(200))[0].angle;
        assert!(later >= just_after);
        assert_eq!(driver.poses(0, mid + ms(700))[0].angle, FLAT_ANGLE);
    }

    #[test]
    fn zero_duration_snaps() {
        let timing = FlipTiming {
            duration: Duration::ZERO,
            easing: PAPER_EASING,
        };
        let now = Instant::now();
        let transition = SheetTransition::new(FLAT_ANGLE, FLIPPED_ANGLE, now);
        assert_eq!(transition.angle_at(&timing, now), FLIPPED_ANGLE);
    }
}
