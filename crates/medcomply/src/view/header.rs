//! Title bar.

use iced::widget::{container, row, text};
use iced::{Element, Length};

use crate::message::Message;
use crate::style::widgets::{header_style, palette};

/// Renders the title bar, with the settings problem if there is one.
pub fn view_header(config_error: Option<&str>) -> Element<'_, Message> {
    let title = text("MedComply")
        .size(22)
        .font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..Default::default()
        })
        .style(|_theme| {
            let p = palette::current();
            text::Style {
                color: Some(p.primary),
            }
        });

    let subtitle = text("Message compliance review").size(13).style(|_theme| {
        let p = palette::current();
        text::Style {
            color: Some(p.text_secondary),
        }
    });

    let mut content = row![title, subtitle]
        .spacing(12)
        .align_y(iced::Alignment::Center);

    if let Some(error) = config_error {
        content = content
            .push(iced::widget::Space::new().width(Length::Fill))
            .push(text(error).size(12).style(|_theme| {
                let p = palette::current();
                text::Style {
                    color: Some(p.error),
                }
            }));
    }

    container(content)
        .width(Length::Fill)
        .padding([12, 20])
        .style(header_style)
        .into()
}
