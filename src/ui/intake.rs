//! Intake surface: drop area, loading notice, preview and format notes

use iced::widget::{column, container, image, mouse_area, text, Column};
use iced::{Alignment, Element, Length};

use super::style;
use crate::intake::IntakeController;
use crate::Message;

pub fn view(intake: &IntakeController, busy: bool) -> Element<'_, Message> {
    // a busy surface never lights up as a drop target
    let drag_active = intake.is_drag_active() && !busy;

    let prompt: Column<Message> = if busy {
        let mut waiting = column![
            text("⏳").size(40),
            text("Analyzing image... This may take a few seconds.").size(16),
        ];
        if intake.in_flight() > 1 {
            waiting =
                waiting.push(text(format!("{} images in progress", intake.in_flight())).size(12));
        }
        waiting
    } else {
        column![
            text("📁").size(40),
            text("Drag & drop your image here, or click to browse").size(16),
        ]
    };

    let zone = container(prompt.spacing(12).align_x(Alignment::Center))
        .padding(40)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .style(style::drop_zone(drag_active, busy));

    let zone: Element<Message> = if busy {
        zone.into()
    } else {
        mouse_area(zone).on_press(Message::BrowseRequested).into()
    };

    let mut content = column![
        text("Upload Medical Image").size(28),
        text("Upload a chest X-ray or other medical image for AI analysis").size(16),
        zone,
    ]
    .spacing(16)
    .width(Length::Fill);

    if let Some(preview) = intake.preview().filter(|_| !busy) {
        content = content.push(
            column![
                text("Image Preview:").size(18),
                image(preview.handle.clone()).width(Length::Fixed(360.0)),
            ]
            .spacing(8),
        );
    }

    content = content.push(
        container(
            column![
                text("Supported Formats:").size(18),
                text("• JPEG, PNG, DICOM"),
                text("• Chest X-rays, CT scans (preliminary)"),
                text("• Maximum file size: 10MB"),
            ]
            .spacing(4),
        )
        .padding(16)
        .width(Length::Fill)
        .style(style::card(None)),
    );

    content.into()
}
