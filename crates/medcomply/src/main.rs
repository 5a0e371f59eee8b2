//! `MedComply` - Desktop compliance classifier for physician messages
//!
//! Built with Rust and the iced GUI framework.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod message;
mod style;
mod view;

use anyhow::Context;
use iced::widget::{column, container, row};
use iced::{Background, Element, Length, Task};
use medcomply_api::{
    ApiClient, ClassifyResponse, MessageId, MessageQuery, MessageRecord, Physician, PhysicianQuery,
};
use medcomply_core::settings::API_URL_ENV;
use medcomply_core::{DirectorySearch, MessageFilter, MessageSearch, SelectionBridge, Settings};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use message::{DirectoryMessage, Message, MessageSearchMessage};
use style::widgets::palette;

/// Shown when a request is attempted without a usable service client.
const NOT_CONFIGURED: &str = "Service URL is not configured";

fn main() -> iced::Result {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "medcomply=debug,medcomply_core=debug,medcomply_api=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MedComply");

    iced::application(MedComply::new, MedComply::update, MedComply::view)
        .title("MedComply")
        .run()
}

/// Main application state.
struct MedComply {
    /// Service client built from settings.
    client: Option<ApiClient>,
    /// Settings load or client construction problem, shown in the header.
    config_error: Option<String>,
    /// Physician directory search.
    directory: DirectorySearch,
    /// Message search and per-message classification.
    messages: MessageSearch,
    /// Seeds the message filter from the physician selection.
    selection: SelectionBridge,
}

impl MedComply {
    /// Create a new application instance.
    fn new() -> (Self, Task<Message>) {
        let today = chrono::Local::now().date_naive();
        let mut app = Self {
            client: None,
            config_error: None,
            directory: DirectorySearch::new(),
            messages: MessageSearch::new(MessageFilter::ending_on(today)),
            selection: SelectionBridge::new(),
        };

        // Usable until the settings file has been read.
        app.configure(&Settings::default().with_env_override(std::env::var(API_URL_ENV).ok()));

        (app, Task::perform(load_settings(), Message::SettingsLoaded))
    }

    /// Rebuilds the service client from settings.
    fn configure(&mut self, settings: &Settings) {
        match settings.client() {
            Ok(client) => {
                info!("Using service at {}", client.base_url());
                self.client = Some(client);
            }
            Err(e) => {
                warn!("Invalid service settings: {}", e);
                self.client = None;
                self.config_error = Some(format!("Invalid service settings: {e}"));
            }
        }
    }

    /// Update state based on message.
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SettingsLoaded(result) => match result {
                Ok(settings) => {
                    self.config_error = None;
                    self.configure(&settings);
                }
                Err(e) => {
                    warn!("Failed to load settings, using defaults: {}", e);
                    self.config_error = Some(format!("Failed to load settings: {e}"));
                }
            },
            Message::Directory(msg) => {
                return self.handle_directory(msg);
            }
            Message::PhysiciansLoaded(generation, result) => {
                self.directory.apply_results(generation, result);
            }
            Message::MessageSearch(msg) => {
                return self.handle_message_search(msg);
            }
            Message::MessagesLoaded(generation, result) => {
                self.messages.apply_results(generation, result);
            }
            Message::Classify(message_id) => {
                return self.start_classification(message_id);
            }
            Message::Classified(ticket, result) => {
                self.messages.apply_classification(ticket, result);
            }
            Message::ResetClassification(message_id) => {
                self.messages.reset_classification(message_id);
            }
            Message::DismissNotice => {
                self.messages.dismiss_classification_notice();
            }
        }
        Task::none()
    }

    /// Handle physician search form messages.
    fn handle_directory(&mut self, msg: DirectoryMessage) -> Task<Message> {
        match msg {
            DirectoryMessage::StateChanged(value) => self.directory.set_state(value),
            DirectoryMessage::SpecialtyChanged(value) => self.directory.set_specialty(value),
            DirectoryMessage::Search => {
                let ticket = self.directory.search();
                let generation = ticket.generation();
                return Task::perform(
                    fetch_physicians(self.client.clone(), ticket.query().clone()),
                    move |result| Message::PhysiciansLoaded(generation, result),
                );
            }
            DirectoryMessage::Select(physician_id) => {
                if self.directory.select(physician_id).is_some()
                    && self
                        .selection
                        .propagate(self.directory.selected(), &mut self.messages)
                {
                    debug!("Message filter seeded with physician {}", physician_id);
                }
            }
        }
        Task::none()
    }

    /// Handle message search form messages.
    fn handle_message_search(&mut self, msg: MessageSearchMessage) -> Task<Message> {
        match msg {
            MessageSearchMessage::PhysicianIdChanged(value) => {
                self.messages.set_physician_id(value);
            }
            MessageSearchMessage::StartDateChanged(value) => self.messages.set_start_date(value),
            MessageSearchMessage::EndDateChanged(value) => self.messages.set_end_date(value),
            MessageSearchMessage::Search => {
                // Validation failures are stored on the controller for display.
                if let Ok(ticket) = self.messages.search() {
                    let generation = ticket.generation();
                    return Task::perform(
                        fetch_messages(self.client.clone(), ticket.query().clone()),
                        move |result| Message::MessagesLoaded(generation, result),
                    );
                }
            }
        }
        Task::none()
    }

    /// Start classifying one displayed message.
    fn start_classification(&mut self, message_id: MessageId) -> Task<Message> {
        match self.messages.classify(message_id) {
            Ok(ticket) => {
                debug!(
                    "Classifying message {} ({} in flight)",
                    message_id,
                    self.messages.classification().in_flight()
                );
                Task::perform(
                    classify_message(self.client.clone(), message_id),
                    move |result| Message::Classified(ticket, result),
                )
            }
            Err(rejection) => {
                debug!("Classify ignored: {}", rejection);
                Task::none()
            }
        }
    }

    /// Render the application view.
    fn view(&self) -> Element<'_, Message> {
        let header = view::view_header(self.config_error.as_deref());
        let directory = view::view_physician_search(&self.directory);
        let messages = view::view_message_search(&self.messages);

        let body = row![directory, messages]
            .spacing(16)
            .padding(16)
            .height(Length::Fill);

        container(column![header, body])
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| {
                let p = palette::current();
                container::Style {
                    background: Some(Background::Color(p.background)),
                    text_color: Some(p.text_primary),
                    ..Default::default()
                }
            })
            .into()
    }
}

/// Load settings from the config directory, applying the environment override.
async fn load_settings() -> Result<Settings, String> {
    Settings::load()
        .await
        .with_context(|| format!("reading {}", Settings::config_path().display()))
        .map(|settings| settings.with_env_override(std::env::var(API_URL_ENV).ok()))
        .map_err(|e| format!("{e:#}"))
}

/// Search the physician directory.
async fn fetch_physicians(
    client: Option<ApiClient>,
    query: PhysicianQuery,
) -> Result<Vec<Physician>, String> {
    let client = client.ok_or_else(|| NOT_CONFIGURED.to_string())?;
    client
        .fetch_physicians(&query)
        .await
        .map_err(|e| e.to_string())
}

/// Search the message store.
async fn fetch_messages(
    client: Option<ApiClient>,
    query: MessageQuery,
) -> Result<Vec<MessageRecord>, String> {
    let client = client.ok_or_else(|| NOT_CONFIGURED.to_string())?;
    client.fetch_messages(&query).await.map_err(|e| e.to_string())
}

/// Ask the classification engine to evaluate one message.
async fn classify_message(
    client: Option<ApiClient>,
    message_id: MessageId,
) -> Result<ClassifyResponse, String> {
    let client = client.ok_or_else(|| NOT_CONFIGURED.to_string())?;
    client
        .classify_message(message_id)
        .await
        .map_err(|e| e.to_string())
}
