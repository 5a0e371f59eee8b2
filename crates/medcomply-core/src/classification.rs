//! Per-message classification lifecycles.
//!
//! Every message has its own outcome, keyed by `MessageId`:
//! `NotStarted -> InProgress -> (Succeeded | Failed)`. Any number of
//! classifications may be in flight at once and they may complete in any
//! order; each completion touches only the key captured in its ticket.
//!
//! The outcome map belongs to one message result set. When a new search
//! replaces the result set the map is cleared and the epoch advances, so a
//! late completion from the previous set is dropped instead of attaching to
//! a message that is no longer displayed.

use std::collections::HashMap;

use medcomply_api::{ClassifyResponse, MessageId};
use tracing::{debug, info, warn};

use crate::generation::Generation;

/// Shared `NotStarted` value returned for messages without an entry.
static NOT_STARTED: ClassificationStatus = ClassificationStatus::NotStarted;

/// Classification state of one message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClassificationStatus {
    /// No classification requested yet.
    #[default]
    NotStarted,
    /// Request outstanding.
    InProgress,
    /// Engine answered; an empty rule list means nothing was triggered.
    Succeeded(ClassifyResponse),
    /// Request failed; carries the failure detail.
    Failed(String),
}

impl ClassificationStatus {
    /// Returns true if `classify` may be invoked from this state.
    #[must_use]
    pub const fn can_classify(&self) -> bool {
        matches!(self, Self::NotStarted | Self::Failed(_))
    }

    /// Returns true while a request is outstanding.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Why a classification was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyRejection {
    /// A request for this message is already outstanding.
    #[error("Message {0} is already being classified")]
    InProgress(MessageId),
    /// The message already has a result; reset it to classify again.
    #[error("Message {0} is already classified")]
    AlreadyClassified(MessageId),
    /// The message is not part of the current result set.
    #[error("Message {0} is not in the current results")]
    UnknownMessage(MessageId),
}

/// Ticket for one outstanding classify request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyTicket {
    message_id: MessageId,
    epoch: Generation,
}

impl ClassifyTicket {
    /// Message the request is for.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }
}

/// Transient, message-scoped failure notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationNotice {
    /// Message whose classification failed.
    pub message_id: MessageId,
    /// Text shown to the user.
    pub text: String,
}

/// Drives classification lifecycles for the current message result set.
#[derive(Debug, Default)]
pub struct ClassificationOrchestrator {
    outcomes: HashMap<MessageId, ClassificationStatus>,
    epoch: Generation,
    notice: Option<ClassificationNotice>,
}

impl ClassificationOrchestrator {
    /// Creates an empty orchestrator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current outcome for a message. Messages without an entry are
    /// `NotStarted`.
    #[must_use]
    pub fn status(&self, message_id: MessageId) -> &ClassificationStatus {
        self.outcomes.get(&message_id).unwrap_or(&NOT_STARTED)
    }

    /// Starts classifying a message.
    ///
    /// # Errors
    ///
    /// Returns a rejection if the message is in progress or already
    /// classified.
    pub fn begin(&mut self, message_id: MessageId) -> Result<ClassifyTicket, ClassifyRejection> {
        let status = self.status(message_id);
        if !status.can_classify() {
            return Err(if status.is_in_progress() {
                ClassifyRejection::InProgress(message_id)
            } else {
                ClassifyRejection::AlreadyClassified(message_id)
            });
        }

        self.outcomes
            .insert(message_id, ClassificationStatus::InProgress);
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.message_id == message_id)
        {
            self.notice = None;
        }
        debug!("Classifying message {} (epoch {})", message_id, self.epoch);

        Ok(ClassifyTicket {
            message_id,
            epoch: self.epoch,
        })
    }

    /// Records the outcome of a classify request.
    ///
    /// The outcome is attributed to the ticket's message. Returns `false` if
    /// the ticket belongs to a result set that has since been replaced.
    pub fn complete(
        &mut self,
        ticket: ClassifyTicket,
        result: Result<ClassifyResponse, String>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            debug!(
                "Dropping classification for message {} from stale epoch {}",
                ticket.message_id, ticket.epoch
            );
            return false;
        }

        let status = match result {
            Ok(response) => {
                if response.message_id != ticket.message_id {
                    warn!(
                        "Classification for message {} echoed message {}",
                        ticket.message_id, response.message_id
                    );
                }
                info!(
                    "Message {} classified: {} rule(s) matched",
                    ticket.message_id,
                    response.matched_rules.len()
                );
                ClassificationStatus::Succeeded(response)
            }
            Err(e) => {
                warn!("Failed to classify message {}: {}", ticket.message_id, e);
                self.notice = Some(ClassificationNotice {
                    message_id: ticket.message_id,
                    text: format!("Failed to classify message {}.", ticket.message_id),
                });
                ClassificationStatus::Failed(e)
            }
        };

        self.outcomes.insert(ticket.message_id, status);
        true
    }

    /// Returns a finished outcome to `NotStarted` so it can be classified
    /// again. In-progress outcomes are left alone.
    pub fn reset(&mut self, message_id: MessageId) -> bool {
        match self.outcomes.get(&message_id) {
            Some(ClassificationStatus::Succeeded(_) | ClassificationStatus::Failed(_)) => {
                self.outcomes.remove(&message_id);
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|n| n.message_id == message_id)
                {
                    self.notice = None;
                }
                true
            }
            _ => false,
        }
    }

    /// Latest failure notice, if not dismissed.
    #[must_use]
    pub const fn notice(&self) -> Option<&ClassificationNotice> {
        self.notice.as_ref()
    }

    /// Dismisses the failure notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Number of outstanding requests.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.outcomes
            .values()
            .filter(|s| s.is_in_progress())
            .count()
    }

    /// Drops every outcome and starts a new epoch.
    pub(crate) fn clear(&mut self) {
        self.outcomes.clear();
        self.notice = None;
        self.epoch.bump();
    }
}
