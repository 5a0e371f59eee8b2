//! Physician search panel.

use iced::widget::{Column, button, column, container, row, scrollable, text, text_input};
use iced::{Element, Length};
use medcomply_api::Physician;
use medcomply_core::{DirectoryPhase, DirectorySearch};

use crate::message::{DirectoryMessage, Message};
use crate::style::widgets::{
    error_banner_style, field_input_style, palette, panel_style, physician_row_selected_style,
    physician_row_style, primary_button_style, scrollable_style,
};

/// Width of the physician panel.
const PANEL_WIDTH: f32 = 340.0;

/// Renders the physician search form and result list.
pub fn view_physician_search(directory: &DirectorySearch) -> Element<'_, Message> {
    let heading = text("Physician Search").size(18).font(iced::Font {
        weight: iced::font::Weight::Semibold,
        ..Default::default()
    });

    let specialty = text_input("Specialty (e.g. Oncology)", directory.specialty())
        .padding([8, 10])
        .style(field_input_style)
        .on_input(|value| Message::Directory(DirectoryMessage::SpecialtyChanged(value)))
        .on_submit(Message::Directory(DirectoryMessage::Search));

    let state = text_input("State (e.g. NY)", directory.state())
        .padding([8, 10])
        .style(field_input_style)
        .on_input(|value| Message::Directory(DirectoryMessage::StateChanged(value)))
        .on_submit(Message::Directory(DirectoryMessage::Search));

    let searching = directory.is_searching();
    let search_btn = button(text(if searching { "Searching..." } else { "Search" }))
        .padding([8, 18])
        .style(primary_button_style)
        .on_press_maybe((!searching).then_some(Message::Directory(DirectoryMessage::Search)));

    let mut content = column![heading, specialty, state, search_btn].spacing(10);

    if let Some(error) = directory.error() {
        content = content.push(
            container(text(error).size(13))
                .width(Length::Fill)
                .padding([6, 10])
                .style(error_banner_style),
        );
    }

    content = content.push(view_results(directory));

    container(content)
        .width(Length::Fixed(PANEL_WIDTH))
        .height(Length::Fill)
        .padding(16)
        .style(panel_style)
        .into()
}

fn view_results(directory: &DirectorySearch) -> Element<'_, Message> {
    if *directory.phase() == DirectoryPhase::Populated && directory.physicians().is_empty() {
        return text("No results")
            .size(14)
            .style(|_theme| {
                let p = palette::current();
                text::Style {
                    color: Some(p.text_muted),
                }
            })
            .into();
    }

    let rows: Vec<Element<'_, Message>> = directory
        .physicians()
        .iter()
        .map(|physician| view_physician_row(physician, directory.is_selected(physician.physician_id)))
        .collect();

    scrollable(Column::with_children(rows).spacing(2))
        .height(Length::Fill)
        .style(scrollable_style)
        .into()
}

fn view_physician_row(physician: &Physician, is_selected: bool) -> Element<'_, Message> {
    let consent = if physician.consent_opt_in {
        "opted in"
    } else {
        "no consent"
    };
    let detail = text(format!("{} | prefers {}", consent, physician.preferred_channel))
        .size(11)
        .style(|_theme| {
            let p = palette::current();
            text::Style {
                color: Some(p.text_secondary),
            }
        });

    let label = column![text(physician.list_label()).size(14), detail].spacing(2);

    button(row![label].width(Length::Fill))
        .width(Length::Fill)
        .padding([6, 10])
        .style(if is_selected {
            physician_row_selected_style
        } else {
            physician_row_style
        })
        .on_press(Message::Directory(DirectoryMessage::Select(
            physician.physician_id,
        )))
        .into()
}
