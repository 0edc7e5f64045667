//! Result surface: diagnosis, findings, recommendations and probabilities

use iced::widget::{button, column, container, horizontal_space, row, text, Column};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use super::meter::meter;
use super::style;
use crate::format::{ProbabilityRow, ResultCard};
use crate::state::data::AnalysisResult;
use crate::Message;

/// Width of one cell in the probabilities grid
const PROBABILITY_CELL_WIDTH: f32 = 220.0;

pub fn view<'a>(result: &AnalysisResult) -> Element<'a, Message> {
    let card = ResultCard::project(result);
    let tier_color = card.tier.color();

    let header = row![
        text("Analysis Results").size(28),
        horizontal_space(),
        button("Analyze New Image")
            .on_press(Message::StartNewAnalysis)
            .padding(10),
    ]
    .align_y(Alignment::Center);

    let meta = column![
        text(format!("File: {}", card.filename)),
        text(format!("Analyzed: {}", card.analyzed_at)),
    ]
    .spacing(4);

    let diagnosis = container(
        column![
            text("Primary Diagnosis").size(18),
            container(text(card.diagnosis).size(24))
                .padding([6, 14])
                .style(style::card(Some(tier_color))),
            meter(card.confidence, tier_color, 14.0),
            text(format!(
                "Confidence: {} ({})",
                card.confidence_percent,
                card.tier.label()
            ))
            .color(tier_color),
        ]
        .spacing(10),
    )
    .padding(16)
    .width(Length::Fill)
    .style(style::card(None));

    let probabilities: Vec<Element<'a, Message>> =
        card.probabilities.into_iter().map(probability_cell).collect();

    column![
        header,
        meta,
        diagnosis,
        section("Clinical Findings", bullet_list(card.findings)),
        section("Recommendations", bullet_list(card.recommendations)),
        section("Condition Probabilities", Wrap::with_elements(probabilities).into()),
        container(text(
            "Important: This AI analysis is for assistance only. Always consult with \
             qualified healthcare professionals for final diagnosis and treatment decisions."
        ))
        .padding(12)
        .width(Length::Fill)
        .style(style::card(None)),
    ]
    .spacing(20)
    .width(Length::Fill)
    .into()
}

fn section<'a>(title: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    container(column![text(title).size(18), body].spacing(8))
        .padding(16)
        .width(Length::Fill)
        .style(style::card(None))
        .into()
}

fn bullet_list<'a>(items: Vec<String>) -> Element<'a, Message> {
    let list: Column<'a, Message> = Column::with_children(
        items
            .into_iter()
            .map(|item| text(format!("• {}", item)).into()),
    );
    list.spacing(4).into()
}

fn probability_cell<'a>(row: ProbabilityRow) -> Element<'a, Message> {
    let color = style::ACCENT;
    container(
        column![
            text(row.condition),
            meter(row.fraction, color, 8.0),
            text(row.percent).size(14),
        ]
        .spacing(4),
    )
    .padding(8)
    .width(Length::Fixed(PROBABILITY_CELL_WIDTH))
    .into()
}
