//! # medcomply-core
//!
//! Search and classification orchestration for the `MedComply` message
//! classifier.
//!
//! This crate provides:
//! - **Directory search** - physician search lifecycle and selection
//! - **Message search** - filter state, supersession of in-flight searches,
//!   and the last-search snapshot used for result summaries
//! - **Classification** - independent per-message classification lifecycles
//! - **Selection bridge** - seeds the message filter from a physician selection
//! - **Settings** - service location and classification defaults
//!
//! Controllers never perform I/O. Starting an operation returns a ticket
//! describing the request to issue; the caller runs the request and hands the
//! outcome back together with the ticket. Responses whose ticket has been
//! superseded are discarded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod classification;
pub mod directory;
mod error;
mod generation;
pub mod messages;
pub mod selection;
pub mod settings;

pub use classification::{
    ClassificationNotice, ClassificationOrchestrator, ClassificationStatus, ClassifyRejection,
    ClassifyTicket,
};
pub use directory::{DirectoryPhase, DirectorySearch, DirectoryTicket};
pub use error::{Error, Result};
pub use generation::Generation;
pub use messages::{MessageFilter, MessageSearch, SearchPhase, SearchSnapshot, SearchTicket};
pub use selection::SelectionBridge;
pub use settings::Settings;
