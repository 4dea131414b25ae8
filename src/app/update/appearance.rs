use super::super::state::App;
use super::Effect;
use std::time::Instant;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_toggle_theme(&mut self, effects: &mut Vec<Effect>) {
        let next = self.config.theme.toggled();
        info!(theme = %next, "Toggled theme");
        self.config.theme = next;
        effects.push(Effect::SaveConfig);
    }

    pub(super) fn handle_window_resized(
        &mut self,
        width: f32,
        height: f32,
        effects: &mut Vec<Effect>,
    ) {
        if !width.is_finite() || !height.is_finite() {
            return;
        }
        let width = width.clamp(320.0, 7680.0);
        let height = height.clamp(240.0, 4320.0);
        self.session.on_viewport_resize(width, Instant::now());

        let changed = (self.config.window_width - width).abs() >= 1.0
            || (self.config.window_height - height).abs() >= 1.0;
        if changed {
            self.config.window_width = width;
            self.config.window_height = height;
            debug!(width, height, "Window size changed");
            effects.push(Effect::SaveConfig);
        }
    }

    pub(super) fn handle_window_moved(&mut self, x: f32, y: f32, effects: &mut Vec<Effect>) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let changed = self
            .config
            .window_pos_x
            .map(|px| (px - x).abs() >= 1.0)
            .unwrap_or(true)
            || self
                .config
                .window_pos_y
                .map(|py| (py - y).abs() >= 1.0)
                .unwrap_or(true);

        if changed {
            self.config.window_pos_x = Some(x);
            self.config.window_pos_y = Some(y);
            debug!(x, y, "Window moved");
            effects.push(Effect::SaveConfig);
        }
    }
}
