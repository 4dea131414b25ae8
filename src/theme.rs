//! Theme selection and container styles for the book stage.

use crate::config::ThemeMode;
use iced::widget::container;
use iced::{Background, Border, Color, Shadow, Theme, Vector};

pub fn iced_theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Night => Theme::Dark,
        ThemeMode::Day => Theme::Light,
    }
}

/// Backdrop behind the open book.
pub fn stage(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        ..container::Style::default()
    }
}

/// A page lying flat.
pub fn page(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(Color::WHITE)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 2.0.into(),
        },
        shadow: Shadow {
            color: Color {
                a: 0.3,
                ..Color::BLACK
            },
            offset: Vector::new(0.0, 3.0),
            blur_radius: 10.0,
        },
        ..container::Style::default()
    }
}

/// A page in the middle of a turn; the heavier shadow lifts it off the stack.
pub fn turning_page(theme: &Theme) -> container::Style {
    container::Style {
        shadow: Shadow {
            color: Color {
                a: 0.45,
                ..Color::BLACK
            },
            offset: Vector::new(0.0, 6.0),
            blur_radius: 18.0,
        },
        ..page(theme)
    }
}

/// Blank back of the last sheet in an odd-length book.
pub fn blank_page(_theme: &Theme) -> container::Style {
    container::Style::default()
}

pub fn side_panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(palette.background.base.color)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_mode_uses_dark_theme() {
        assert_eq!(iced_theme(ThemeMode::Night), Theme::Dark);
        assert_eq!(iced_theme(ThemeMode::Day), Theme::Light);
    }
}
