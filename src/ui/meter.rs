//! Horizontal meter bar for confidence and probability values

use iced::widget::canvas::{self, Canvas};
use iced::{Color, Element, Length, Point, Rectangle, Size};

use crate::Message;

/// Unfilled part of the bar
const TRACK: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.12);

/// A bar filled to `fraction` of its width
#[derive(Debug, Clone, Copy)]
pub struct Meter {
    pub fraction: f32,
    pub color: Color,
}

impl Meter {
    /// Width of the filled part for a bar `width` pixels wide
    pub fn filled_width(&self, width: f32) -> f32 {
        if self.fraction.is_finite() {
            width * self.fraction.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl canvas::Program<Message> for Meter {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), TRACK);

        let filled = self.filled_width(bounds.width);
        if filled > 0.0 {
            frame.fill_rectangle(Point::ORIGIN, Size::new(filled, bounds.height), self.color);
        }

        vec![frame.into_geometry()]
    }
}

/// A full-width meter `height` pixels tall
pub fn meter<'a>(fraction: f64, color: Color, height: f32) -> Element<'a, Message> {
    let bar: Canvas<Meter, Message> = Canvas::new(Meter {
        fraction: fraction as f32,
        color,
    });

    bar.width(Length::Fill).height(Length::Fixed(height)).into()
}
