//! User interface module
//!
//! Views are pure projections of application state:
//! - intake.rs: upload surface
//! - results.rs: analysis result surface
//! - meter.rs: canvas bar used for confidence and probabilities
//! - style.rs: shared container styles

pub mod intake;
pub mod meter;
pub mod results;
pub mod style;

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};

use crate::Message;

pub fn header<'a>() -> Element<'a, Message> {
    container(
        column![
            text("🩺 RadAssist").size(36),
            text("AI-Powered Radiology Assistant").size(16),
        ]
        .spacing(4)
        .align_x(Alignment::Center),
    )
    .padding(20)
    .center_x(Length::Fill)
    .into()
}

pub fn footer<'a>(service_status: &'a str) -> Element<'a, Message> {
    container(
        column![
            text("RadAssist - Transforming Medical Imaging with AI").size(14),
            text(
                "Disclaimer: This is a demonstration tool. Always consult with qualified \
                 healthcare professionals for medical diagnosis."
            )
            .size(12),
            text(service_status).size(12),
        ]
        .spacing(4)
        .align_x(Alignment::Center),
    )
    .padding(12)
    .center_x(Length::Fill)
    .into()
}

/// Error notice drawn over whichever surface is underneath
pub fn error_overlay<'a>(message: &'a str) -> Element<'a, Message> {
    let notice = container(
        column![
            text("Error").size(22),
            text(message),
            button("Try Again").on_press(Message::DismissError).padding(8),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .padding(24)
    .max_width(480.0)
    .style(style::error_card);

    container(notice)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(style::scrim)
        .into()
}
