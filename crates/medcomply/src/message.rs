//! Message types for application events.
//!
//! In the Elm architecture, Messages are events that trigger state changes.

use medcomply_api::{ClassifyResponse, MessageId, MessageRecord, Physician, PhysicianId};
use medcomply_core::{ClassifyTicket, Generation, Settings};

/// Application messages (events).
#[derive(Debug, Clone)]
pub enum Message {
    // Startup
    /// Settings loaded (or failed to load) from disk.
    SettingsLoaded(Result<Settings, String>),

    // Physician directory
    /// Physician search form messages.
    Directory(DirectoryMessage),
    /// Physician search completed.
    PhysiciansLoaded(Generation, Result<Vec<Physician>, String>),

    // Message search
    /// Message search form messages.
    MessageSearch(MessageSearchMessage),
    /// Message search completed.
    MessagesLoaded(Generation, Result<Vec<MessageRecord>, String>),

    // Classification
    /// Classify one displayed message.
    Classify(MessageId),
    /// Classification request completed.
    Classified(ClassifyTicket, Result<ClassifyResponse, String>),
    /// Clear a finished classification so it can be run again.
    ResetClassification(MessageId),
    /// Dismiss the classification failure notice.
    DismissNotice,
}

/// Physician search form messages.
#[derive(Debug, Clone)]
pub enum DirectoryMessage {
    /// State filter changed.
    StateChanged(String),
    /// Specialty filter changed.
    SpecialtyChanged(String),
    /// Run the search.
    Search,
    /// Physician clicked in the result list.
    Select(PhysicianId),
}

/// Message search form messages.
#[derive(Debug, Clone)]
pub enum MessageSearchMessage {
    /// Physician id field changed.
    PhysicianIdChanged(String),
    /// Start date field changed.
    StartDateChanged(String),
    /// End date field changed.
    EndDateChanged(String),
    /// Run the search.
    Search,
}
