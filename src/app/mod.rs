mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use crate::config::AppConfig;
use iced::{Point, Size, window};

/// Launch the reader window, opening `sources` once the window is up.
pub fn run_app(config: AppConfig, sources: Vec<String>) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        position: match (config.window_pos_x, config.window_pos_y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                window::Position::Specific(Point::new(x, y))
            }
            _ => window::Position::Default,
        },
        // Closing goes through safe quit so state is flushed first.
        exit_on_close_request: false,
        ..window::Settings::default()
    };

    iced::application(App::title, App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| crate::theme::iced_theme(app.config.theme))
        .run_with(move || App::bootstrap(config, sources))
}
