//! Message search panel with per-message classification.

use iced::widget::{Column, Row, button, column, container, row, scrollable, text, text_input};
use iced::{Element, Length};
use medcomply_api::{ClassifyResponse, MatchedRule, MessageId, MessageRecord};
use medcomply_core::messages::EMPTY_RESULTS;
use medcomply_core::{ClassificationStatus, MessageSearch, SearchPhase};

use crate::message::{Message, MessageSearchMessage};
use crate::style::widgets::{
    error_banner_style, field_input_style, ghost_button_style, palette, panel_style,
    primary_button_style, rule_chip_style, scrollable_style, table_header_style, table_row_style,
};

/// Placeholder for missing enrichment fields.
const NOT_AVAILABLE: &str = "N/A";

/// Column widths (portions) of the message table.
const COLUMNS: [(&str, u16); 8] = [
    ("ID", 1),
    ("Timestamp", 3),
    ("Channel", 2),
    ("Direction", 2),
    ("Topic", 2),
    ("Sentiment", 2),
    ("Message", 6),
    ("Classification", 5),
];

/// Renders the message search form, result summary, and message table.
pub fn view_message_search(search: &MessageSearch) -> Element<'_, Message> {
    let heading = text("Message Search").size(18).font(iced::Font {
        weight: iced::font::Weight::Semibold,
        ..Default::default()
    });

    let filter = search.filter();
    let on_submit = Message::MessageSearch(MessageSearchMessage::Search);

    let physician_id = text_input("Physician ID (blank for all)", &filter.physician_id)
        .width(Length::FillPortion(2))
        .padding([8, 10])
        .style(field_input_style)
        .on_input(|value| Message::MessageSearch(MessageSearchMessage::PhysicianIdChanged(value)))
        .on_submit(on_submit.clone());

    let start_date = text_input("From (YYYY-MM-DD)", &filter.start_date)
        .width(Length::FillPortion(1))
        .padding([8, 10])
        .style(field_input_style)
        .on_input(|value| Message::MessageSearch(MessageSearchMessage::StartDateChanged(value)))
        .on_submit(on_submit.clone());

    let end_date = text_input("To (YYYY-MM-DD)", &filter.end_date)
        .width(Length::FillPortion(1))
        .padding([8, 10])
        .style(field_input_style)
        .on_input(|value| Message::MessageSearch(MessageSearchMessage::EndDateChanged(value)))
        .on_submit(on_submit.clone());

    let searching = search.is_searching();
    let search_btn = button(text(if searching { "Searching..." } else { "Search" }))
        .padding([8, 18])
        .style(primary_button_style)
        .on_press_maybe((!searching).then_some(on_submit));

    let form = row![physician_id, start_date, end_date, search_btn]
        .spacing(10)
        .align_y(iced::Alignment::Center);

    let mut content = column![heading, form].spacing(12);

    if let Some(error) = search.validation_error() {
        content = content.push(error_line(error));
    }
    if let Some(error) = search.fetch_error() {
        content = content.push(error_line(error));
    }
    if let Some(notice) = search.classification().notice() {
        content = content.push(
            container(
                row![
                    text(notice.text.as_str()).size(13).width(Length::Fill),
                    button(text("Dismiss").size(12))
                        .padding([2, 8])
                        .style(ghost_button_style)
                        .on_press(Message::DismissNotice),
                ]
                .align_y(iced::Alignment::Center),
            )
            .width(Length::Fill)
            .padding([6, 10])
            .style(error_banner_style),
        );
    }
    if let Some(summary) = search.summary() {
        content = content.push(text(summary).size(14).font(iced::Font {
            weight: iced::font::Weight::Semibold,
            ..Default::default()
        }));
    }

    content = content.push(view_results(search));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(16)
        .style(panel_style)
        .into()
}

/// Enrichment field text, `N/A` when the service omitted it.
fn optional_field(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// Heading of a matched rule chip: id, name, and result type.
fn rule_title(rule: &MatchedRule) -> String {
    format!("{} {} ({})", rule.id, rule.name, rule.result_type)
}

fn error_line(error: &str) -> Element<'_, Message> {
    container(text(error).size(13))
        .width(Length::Fill)
        .padding([6, 10])
        .style(error_banner_style)
        .into()
}

fn muted(label: &str) -> iced::widget::Text<'_> {
    text(label).size(13).style(|_theme| {
        let p = palette::current();
        text::Style {
            color: Some(p.text_muted),
        }
    })
}

fn view_results(search: &MessageSearch) -> Element<'_, Message> {
    match search.phase() {
        SearchPhase::Idle | SearchPhase::Failed(_) => return column![].into(),
        SearchPhase::Searching => return muted("Loading messages...").into(),
        SearchPhase::Empty => return muted(EMPTY_RESULTS).into(),
        SearchPhase::Results => {}
    }

    let labels: Vec<Element<'_, Message>> = COLUMNS
        .iter()
        .map(|(label, portion)| text(*label).size(12).width(Length::FillPortion(*portion)).into())
        .collect();
    let header = container(Row::with_children(labels).spacing(8))
        .padding([6, 10])
        .style(table_header_style);

    let rows: Vec<Element<'_, Message>> = search
        .messages()
        .iter()
        .map(|record| {
            view_message_row(record, search.classification_status(record.message_id))
        })
        .collect();

    column![
        header,
        scrollable(Column::with_children(rows))
            .height(Length::Fill)
            .style(scrollable_style),
    ]
    .into()
}

fn view_message_row<'a>(
    record: &'a MessageRecord,
    status: &'a ClassificationStatus,
) -> Element<'a, Message> {
    let timestamp = record.parsed_timestamp().map_or_else(
        || record.timestamp.clone(),
        |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
    );
    let topic = optional_field(record.topic.as_deref());
    let sentiment = optional_field(record.sentiment.as_deref());

    let cell = |value: String, portion: u16| -> Element<'a, Message> {
        text(value).size(13).width(Length::FillPortion(portion)).into()
    };

    let cells = row![
        cell(record.message_id.to_string(), COLUMNS[0].1),
        cell(timestamp, COLUMNS[1].1),
        cell(record.channel.clone(), COLUMNS[2].1),
        cell(record.direction.clone(), COLUMNS[3].1),
        cell(topic.to_string(), COLUMNS[4].1),
        cell(sentiment.to_string(), COLUMNS[5].1),
        cell(record.message_text.clone(), COLUMNS[6].1),
        container(view_classification(record.message_id, status))
            .width(Length::FillPortion(COLUMNS[7].1)),
    ]
    .spacing(8);

    container(cells)
        .width(Length::Fill)
        .padding([8, 10])
        .style(table_row_style)
        .into()
}

fn view_classification(message_id: MessageId, status: &ClassificationStatus) -> Element<'_, Message> {
    match status {
        ClassificationStatus::NotStarted => button(text("Classify").size(12))
            .padding([4, 12])
            .style(primary_button_style)
            .on_press(Message::Classify(message_id))
            .into(),
        ClassificationStatus::InProgress => button(text("Classifying...").size(12))
            .padding([4, 12])
            .style(primary_button_style)
            .into(),
        ClassificationStatus::Succeeded(response) => column![
            view_rules(response),
            button(text("Reset").size(11))
                .padding([2, 8])
                .style(ghost_button_style)
                .on_press(Message::ResetClassification(message_id)),
        ]
        .spacing(4)
        .into(),
        ClassificationStatus::Failed(_) => row![
            text("Classification failed").size(12).style(|_theme| {
                let p = palette::current();
                text::Style {
                    color: Some(p.error),
                }
            }),
            button(text("Retry").size(12))
                .padding([4, 12])
                .style(primary_button_style)
                .on_press(Message::Classify(message_id)),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center)
        .into(),
    }
}

fn view_rules(response: &ClassifyResponse) -> Element<'_, Message> {
    if response.is_clean() {
        return text("No rules triggered.")
            .size(12)
            .style(|_theme| {
                let p = palette::current();
                text::Style {
                    color: Some(p.clean),
                }
            })
            .into();
    }

    let chips: Vec<Element<'_, Message>> = response
        .matched_rules
        .iter()
        .map(|rule| {
            let title = text(rule_title(rule))
                .size(12)
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..Default::default()
                })
                .style(|_theme| {
                    let p = palette::current();
                    text::Style {
                        color: Some(p.flagged),
                    }
                });
            let mut body = column![title, text(rule.result_text.as_str()).size(12)].spacing(2);
            if !rule.matched_keywords.is_empty() {
                body = body.push(
                    text(format!("Keywords: {}", rule.matched_keywords.join(", "))).size(11),
                );
            }
            container(body)
                .width(Length::Fill)
                .padding([4, 8])
                .style(rule_chip_style)
                .into()
        })
        .collect();

    Column::with_children(chips).spacing(4).into()
}
