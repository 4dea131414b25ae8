//! Navigation state machine.
//!
//! `NavigationState` is the only owner of the reading position, zoom scale
//! and panel visibility. Everything goes through [`NavigationState::dispatch`];
//! actions that concern bookmark membership are handed back to the caller as
//! [`NavOutcome::Delegated`] so the ledger stays the sole mutator of its set.

use crate::bookmarks::BookmarkOp;
use crate::scale::suggested_scale;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 2.0;
pub const DEFAULT_SCALE: f32 = 1.0;
pub const SCALE_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export)]
pub struct PanelState {
    pub show_thumbnails: bool,
    pub show_bookmarks: bool,
    pub show_library: bool,
}

impl PanelState {
    pub fn any_open(&self) -> bool {
        self.show_thumbnails || self.show_bookmarks || self.show_library
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavAction {
    Next,
    Prev,
    JumpTo(usize),
    ZoomIn,
    ZoomOut,
    ToggleThumbnails,
    ToggleBookmarksList,
    ToggleLibrary,
    ToggleBookmarkCurrent,
    RemoveBookmark(usize),
    CloseAllPanels,
    ToggleFullscreen,
    FitViewport { width: f32 },
    /// Restore a saved zoom level, snapped to the zoom step grid.
    SetScale(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Changed,
    Unchanged,
    Delegated(BookmarkOp),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    current_position: usize,
    total_pages: usize,
    scale: f32,
    panels: PanelState,
    is_fullscreen: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(0, DEFAULT_SCALE)
    }
}

impl NavigationState {
    pub fn new(total_pages: usize, scale: f32) -> Self {
        Self {
            current_position: 0,
            total_pages,
            scale: clamp_scale(scale),
            panels: PanelState::default(),
            is_fullscreen: false,
        }
    }

    pub fn current_position(&self) -> usize {
        self.current_position
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn panels(&self) -> PanelState {
        self.panels
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Highest position `Next` may reach: the last even index of the book.
    pub fn last_position(&self) -> usize {
        self.total_pages.saturating_sub(1) & !1
    }

    pub fn can_prev(&self) -> bool {
        self.current_position > 0
    }

    pub fn can_next(&self) -> bool {
        self.current_position < self.last_position()
    }

    /// Swap in a new page list: back to the first spread, panels closed.
    /// Scale and fullscreen survive the swap.
    pub fn reset_for_book(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
        self.current_position = 0;
        self.panels = PanelState::default();
    }

    pub fn dispatch(&mut self, action: NavAction) -> NavOutcome {
        match action {
            NavAction::Next => {
                let target = (self.current_position + 2).min(self.last_position());
                self.set_position(target)
            }
            NavAction::Prev => self.set_position(self.current_position.saturating_sub(2)),
            NavAction::JumpTo(target) => self.set_position(self.normalize_target(target)),
            NavAction::ZoomIn => self.set_scale(step_scale(self.scale, SCALE_STEP)),
            NavAction::ZoomOut => self.set_scale(step_scale(self.scale, -SCALE_STEP)),
            NavAction::ToggleThumbnails => {
                let show = !self.panels.show_thumbnails;
                self.set_panels(PanelState {
                    show_thumbnails: show,
                    ..PanelState::default()
                })
            }
            NavAction::ToggleBookmarksList => {
                let show = !self.panels.show_bookmarks;
                self.set_panels(PanelState {
                    show_bookmarks: show,
                    ..PanelState::default()
                })
            }
            NavAction::ToggleLibrary => {
                let show = !self.panels.show_library;
                self.set_panels(PanelState {
                    show_library: show,
                    ..PanelState::default()
                })
            }
            NavAction::CloseAllPanels => self.set_panels(PanelState::default()),
            NavAction::ToggleBookmarkCurrent => {
                NavOutcome::Delegated(BookmarkOp::Toggle(self.current_position))
            }
            NavAction::RemoveBookmark(page) => NavOutcome::Delegated(BookmarkOp::Remove(page)),
            NavAction::ToggleFullscreen => {
                self.is_fullscreen = !self.is_fullscreen;
                NavOutcome::Changed
            }
            NavAction::FitViewport { width } => {
                self.set_scale(suggested_scale(width, self.scale))
            }
            NavAction::SetScale(scale) => self.set_scale(step_scale(clamp_scale(scale), 0.0)),
        }
    }

    /// Clamp into the book, then drop odd targets onto the spread's front.
    fn normalize_target(&self, target: usize) -> usize {
        let clamped = target.min(self.total_pages.saturating_sub(1));
        clamped & !1
    }

    fn set_position(&mut self, position: usize) -> NavOutcome {
        if position == self.current_position {
            return NavOutcome::Unchanged;
        }
        self.current_position = position;
        NavOutcome::Changed
    }

    fn set_scale(&mut self, scale: f32) -> NavOutcome {
        let scale = clamp_scale(scale);
        if (scale - self.scale).abs() < f32::EPSILON {
            return NavOutcome::Unchanged;
        }
        self.scale = scale;
        NavOutcome::Changed
    }

    fn set_panels(&mut self, panels: PanelState) -> NavOutcome {
        if panels == self.panels {
            return NavOutcome::Unchanged;
        }
        self.panels = panels;
        NavOutcome::Changed
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    if !scale.is_finite() {
        return DEFAULT_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn step_scale(scale: f32, delta: f32) -> f32 {
    (((scale + delta) * 10.0).round() / 10.0).clamp(MIN_SCALE, MAX_SCALE)
}
