//! Container styles shared by the views

use iced::widget::container;
use iced::{Background, Border, Color, Theme};

/// Highlight for an active drop target
pub const ACCENT: Color = Color::from_rgb(0.25, 0.55, 0.95);

/// Error overlay background
pub const ERROR_BACKGROUND: Color = Color::from_rgb(0.36, 0.11, 0.11);

/// The dashed-looking upload area; brighter while a drag hovers over it
pub fn drop_zone(active: bool, busy: bool) -> impl Fn(&Theme) -> container::Style {
    move |theme: &Theme| {
        let palette = theme.extended_palette();
        let (border_color, background) = if active {
            (ACCENT, Color { a: 0.15, ..ACCENT })
        } else if busy {
            (palette.background.strong.color, palette.background.weak.color)
        } else {
            (palette.background.strong.color, palette.background.base.color)
        };

        container::Style {
            background: Some(Background::Color(background)),
            border: Border {
                color: border_color,
                width: 2.0,
                radius: 12.0.into(),
            },
            ..container::Style::default()
        }
    }
}

/// A raised card, optionally outlined in `accent`
pub fn card(accent: Option<Color>) -> impl Fn(&Theme) -> container::Style {
    move |theme: &Theme| {
        let palette = theme.extended_palette();
        container::Style {
            background: Some(Background::Color(palette.background.weak.color)),
            border: Border {
                color: accent.unwrap_or(palette.background.strong.color),
                width: if accent.is_some() { 3.0 } else { 1.0 },
                radius: 8.0.into(),
            },
            ..container::Style::default()
        }
    }
}

pub fn error_card(_theme: &Theme) -> container::Style {
    container::Style {
        text_color: Some(Color::WHITE),
        background: Some(Background::Color(ERROR_BACKGROUND)),
        border: Border {
            color: Color::from_rgb8(0xF4, 0x43, 0x36),
            width: 2.0,
            radius: 8.0.into(),
        },
        ..container::Style::default()
    }
}

/// Dims whatever sits under the error overlay
pub fn scrim(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.55))),
        ..container::Style::default()
    }
}
