//! Message search lifecycle.
//!
//! `Idle -> Searching -> (Results | Empty | Failed)`, restartable from any
//! state. Issuing a search clears the previous result set and every
//! classification outcome in the same transition, then records a snapshot of
//! the filter as issued. A response is applied only if it belongs to the most
//! recently issued search.

use std::fmt;

use chrono::NaiveDate;
use medcomply_api::query::{format_date, parse_date_input};
use medcomply_api::{ClassifyResponse, MessageId, MessageQuery, MessageRecord, PhysicianId};
use tracing::{debug, info, warn};

use crate::classification::{
    ClassificationOrchestrator, ClassificationStatus, ClassifyRejection, ClassifyTicket,
};
use crate::generation::Generation;

/// Shown when the message store request fails.
pub const FETCH_FAILED: &str = "Failed to load messages.";

/// Shown when a search returned nothing.
pub const EMPTY_RESULTS: &str = "No messages found for the selected criteria.";

/// Live (editable) message search filter.
///
/// Dates are kept as typed so a half-entered date is never lost; they are
/// parsed when a search is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Physician id text.
    pub physician_id: String,
    /// Start date text, `YYYY-MM-DD` or blank.
    pub start_date: String,
    /// End date text, `YYYY-MM-DD` or blank.
    pub end_date: String,
}

impl MessageFilter {
    /// Creates a filter with an initial end date.
    #[must_use]
    pub fn ending_on(end_date: NaiveDate) -> Self {
        Self {
            end_date: format_date(end_date),
            ..Self::default()
        }
    }
}

/// Filter values captured when a search was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// Physician id as sent in the query, empty for all physicians.
    pub physician_id: String,
    /// Start date as selected.
    pub start_date: Option<NaiveDate>,
    /// End date as selected (not the shifted wire value).
    pub end_date: Option<NaiveDate>,
}

impl SearchSnapshot {
    /// Human-readable description of the issued search.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.physician_id.is_empty() {
            write!(f, "Results for: All Physicians Messages")?;
        } else {
            write!(f, "Results for: Physician ID {} Messages", self.physician_id)?;
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                write!(f, " from {} to {}", format_date(start), format_date(end))
            }
            (Some(start), None) => write!(f, " after or on {}", format_date(start)),
            (None, Some(end)) => write!(f, " before or on {}", format_date(end)),
            (None, None) => Ok(()),
        }
    }
}

/// Phase of the current search cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No search issued yet.
    #[default]
    Idle,
    /// Request outstanding.
    Searching,
    /// Non-empty result set.
    Results,
    /// Search succeeded with no messages.
    Empty,
    /// Request failed.
    Failed(String),
}

/// Ticket for one issued message search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: Generation,
    query: MessageQuery,
}

impl SearchTicket {
    /// Generation of the issued search.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Query to send to the message store.
    #[must_use]
    pub const fn query(&self) -> &MessageQuery {
        &self.query
    }
}

/// Owns the message search and the classification outcomes keyed against
/// its result set.
#[derive(Debug, Default)]
pub struct MessageSearch {
    filter: MessageFilter,
    phase: SearchPhase,
    messages: Vec<MessageRecord>,
    snapshot: Option<SearchSnapshot>,
    validation_error: Option<String>,
    generation: Generation,
    classification: ClassificationOrchestrator,
}

impl MessageSearch {
    /// Creates a controller with an initial filter.
    #[must_use]
    pub fn new(filter: MessageFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Live filter.
    #[must_use]
    pub const fn filter(&self) -> &MessageFilter {
        &self.filter
    }

    /// Updates the physician id field.
    pub fn set_physician_id(&mut self, text: impl Into<String>) {
        self.filter.physician_id = text.into();
    }

    /// Updates the start date field.
    pub fn set_start_date(&mut self, text: impl Into<String>) {
        self.filter.start_date = text.into();
    }

    /// Updates the end date field.
    pub fn set_end_date(&mut self, text: impl Into<String>) {
        self.filter.end_date = text.into();
    }

    /// Seeds the physician id field from a directory selection. Other fields
    /// are left as the user typed them.
    pub fn seed_physician_id(&mut self, id: PhysicianId) {
        debug!("Seeding message filter with physician {}", id);
        self.filter.physician_id = id.to_string();
    }

    /// Issues a search over the live filter.
    ///
    /// On success the previous result set and all classification outcomes
    /// are cleared, the snapshot is recorded, and the returned ticket carries
    /// the query to run.
    ///
    /// # Errors
    ///
    /// Returns the validation message if the filter does not translate into
    /// a query. Nothing is cleared in that case.
    pub fn search(&mut self) -> Result<SearchTicket, String> {
        let translated = parse_date_input(&self.filter.start_date).and_then(|start| {
            let end = parse_date_input(&self.filter.end_date)?;
            let query = MessageQuery::translate(&self.filter.physician_id, start, end)?;
            Ok((start, end, query))
        });

        let (start_date, end_date, query) = match translated {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Message search rejected: {}", e);
                let message = e.message().to_string();
                self.validation_error = Some(message.clone());
                // One error at a time: the stale fetch failure gives way.
                if matches!(self.phase, SearchPhase::Failed(_)) {
                    self.phase = SearchPhase::Idle;
                }
                return Err(message);
            }
        };

        let generation = self.generation.bump();
        self.validation_error = None;
        self.messages.clear();
        self.classification.clear();
        self.snapshot = Some(SearchSnapshot {
            physician_id: query
                .physician_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            start_date,
            end_date,
        });
        self.phase = SearchPhase::Searching;
        info!(
            "Message search {} issued: {}",
            generation,
            query.to_query_string()
        );

        Ok(SearchTicket { generation, query })
    }

    /// Applies the outcome of a search.
    ///
    /// Returns `false` if a newer search has been issued since (or this one
    /// was already applied), in which case nothing changes.
    pub fn apply_results(
        &mut self,
        generation: Generation,
        result: Result<Vec<MessageRecord>, String>,
    ) -> bool {
        if generation != self.generation || !self.is_searching() {
            debug!(
                "Discarding message search {} (current {})",
                generation, self.generation
            );
            return false;
        }

        match result {
            Ok(messages) => {
                info!("Message search {} returned {} message(s)", generation, messages.len());
                self.phase = if messages.is_empty() {
                    SearchPhase::Empty
                } else {
                    SearchPhase::Results
                };
                self.messages = messages;
            }
            Err(e) => {
                warn!("Message search {} failed: {}", generation, e);
                self.messages.clear();
                self.snapshot = None;
                self.phase = SearchPhase::Failed(FETCH_FAILED.to_string());
            }
        }
        true
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    /// Returns true while a search is outstanding.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        matches!(self.phase, SearchPhase::Searching)
    }

    /// Current result set. Always empty while searching.
    #[must_use]
    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    /// Snapshot of the last issued search.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&SearchSnapshot> {
        self.snapshot.as_ref()
    }

    /// "Results for ..." line, hidden while a search is outstanding.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if self.is_searching() {
            return None;
        }
        self.snapshot.as_ref().map(SearchSnapshot::summary)
    }

    /// Validation message from the last rejected search.
    #[must_use]
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// Fetch failure message, if the last search failed.
    #[must_use]
    pub fn fetch_error(&self) -> Option<&str> {
        match &self.phase {
            SearchPhase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Classification outcomes for the current result set.
    #[must_use]
    pub const fn classification(&self) -> &ClassificationOrchestrator {
        &self.classification
    }

    /// Classification status of one message.
    #[must_use]
    pub fn classification_status(&self, message_id: MessageId) -> &ClassificationStatus {
        self.classification.status(message_id)
    }

    /// Starts classifying a message from the current result set.
    ///
    /// # Errors
    ///
    /// Returns a rejection if the message is not displayed, already in
    /// progress, or already classified.
    pub fn classify(&mut self, message_id: MessageId) -> Result<ClassifyTicket, ClassifyRejection> {
        if !self.messages.iter().any(|m| m.message_id == message_id) {
            return Err(ClassifyRejection::UnknownMessage(message_id));
        }
        self.classification.begin(message_id)
    }

    /// Records a classification outcome. Returns `false` if the ticket
    /// predates the current result set.
    pub fn apply_classification(
        &mut self,
        ticket: ClassifyTicket,
        result: Result<ClassifyResponse, String>,
    ) -> bool {
        self.classification.complete(ticket, result)
    }

    /// Returns a finished classification to `NotStarted`.
    pub fn reset_classification(&mut self, message_id: MessageId) -> bool {
        self.classification.reset(message_id)
    }

    /// Dismisses the classification failure notice.
    pub fn dismiss_classification_notice(&mut self) {
        self.classification.dismiss_notice();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcomply_api::MatchedRule;

    fn record(id: i64, physician: i64) -> MessageRecord {
        MessageRecord {
            message_id: MessageId(id),
            physician_id: PhysicianId(physician),
            channel: "email".into(),
            direction: "inbound".into(),
            timestamp: "2024-03-10T12:00:00".into(),
            message_text: format!("message {id}"),
            campaign_id: None,
            topic: None,
            compliance_tag: None,
            sentiment: None,
            delivery_status: None,
            response_latency_sec: None,
        }
    }

    fn classified(id: i64, rules: Vec<MatchedRule>) -> ClassifyResponse {
        ClassifyResponse {
            message_id: MessageId(id),
            message_text: format!("message {id}"),
            compliance_version: "v1".into(),
            matched_rules: rules,
        }
    }

    fn loaded(ids: &[i64]) -> MessageSearch {
        let mut search = MessageSearch::default();
        let ticket = search.search().unwrap();
        search.apply_results(
            ticket.generation(),
            Ok(ids.iter().map(|id| record(*id, 101)).collect()),
        );
        search
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_search_encodes_inclusive_range() {
        let mut search = MessageSearch::default();
        search.set_start_date("2024-03-01");
        search.set_end_date("2024-03-10");

        let ticket = search.search().unwrap();
        assert_eq!(
            ticket.query().to_query_string(),
            "start_date=2024-03-01&end_date=2024-03-11"
        );
        assert!(search.is_searching());
        assert!(search.summary().is_none());
    }

    #[test]
    fn test_invalid_identifier_issues_nothing() {
        let mut search = loaded(&[1, 2]);
        let generation = search.generation;
        search.set_physician_id("abc");

        let err = search.search().unwrap_err();
        assert_eq!(err, "Invalid Physician ID.");
        assert_eq!(search.validation_error(), Some("Invalid Physician ID."));
        assert_eq!(search.generation, generation);
        assert_eq!(search.messages().len(), 2);
        assert_eq!(search.phase(), &SearchPhase::Results);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let mut search = MessageSearch::default();
        search.set_end_date("10/03/2024");
        assert!(search.search().is_err());
        assert_eq!(search.phase(), &SearchPhase::Idle);
    }

    #[test]
    fn test_results_and_empty_phases() {
        let search = loaded(&[1]);
        assert_eq!(search.phase(), &SearchPhase::Results);

        let search = loaded(&[]);
        assert_eq!(search.phase(), &SearchPhase::Empty);
        assert!(search.fetch_error().is_none());
        assert_eq!(
            search.summary().as_deref(),
            Some("Results for: All Physicians Messages")
        );
    }

    #[test]
    fn test_fetch_failure_clears_snapshot() {
        let mut search = MessageSearch::default();
        search.set_physician_id("101");
        let ticket = search.search().unwrap();
        assert!(search.snapshot().is_some());

        search.apply_results(ticket.generation(), Err("status 500".into()));
        assert_eq!(search.fetch_error(), Some(FETCH_FAILED));
        assert!(search.snapshot().is_none());
        assert!(search.summary().is_none());
        assert!(search.messages().is_empty());
    }

    #[test]
    fn test_rejected_search_replaces_fetch_error() {
        let mut search = MessageSearch::default();
        let ticket = search.search().unwrap();
        search.apply_results(ticket.generation(), Err("status 500".into()));
        assert_eq!(search.fetch_error(), Some(FETCH_FAILED));

        search.set_physician_id("abc");
        assert!(search.search().is_err());
        assert_eq!(search.validation_error(), Some("Invalid Physician ID."));
        assert!(search.fetch_error().is_none());
        assert_eq!(search.phase(), &SearchPhase::Idle);
    }

    #[test]
    fn test_summary_uses_parsed_identifier() {
        let mut search = MessageSearch::default();
        search.set_physician_id(" 0101 ");
        let ticket = search.search().unwrap();
        assert_eq!(ticket.query().to_query_string(), "physician_id=101");

        search.apply_results(ticket.generation(), Ok(vec![record(1, 101)]));
        assert_eq!(
            search.summary().as_deref(),
            Some("Results for: Physician ID 101 Messages")
        );
    }

    #[test]
    fn test_summary_cases() {
        let mut snapshot = SearchSnapshot {
            physician_id: "101".into(),
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 10)),
        };
        assert_eq!(
            snapshot.summary(),
            "Results for: Physician ID 101 Messages from 2024-03-01 to 2024-03-10"
        );

        snapshot.end_date = None;
        assert_eq!(
            snapshot.summary(),
            "Results for: Physician ID 101 Messages after or on 2024-03-01"
        );

        snapshot.start_date = None;
        snapshot.end_date = Some(date(2024, 3, 10));
        snapshot.physician_id.clear();
        assert_eq!(
            snapshot.summary(),
            "Results for: All Physicians Messages before or on 2024-03-10"
        );

        snapshot.end_date = None;
        assert_eq!(snapshot.summary(), "Results for: All Physicians Messages");
    }

    #[test]
    fn test_summary_ignores_live_edits() {
        let mut search = MessageSearch::new(MessageFilter::ending_on(date(2024, 3, 10)));
        search.set_physician_id("101");
        let ticket = search.search().unwrap();
        search.apply_results(ticket.generation(), Ok(vec![record(1, 101)]));

        let before = search.summary();
        search.set_physician_id("202");
        search.set_start_date("2023-01-01");
        search.set_end_date("");
        assert_eq!(search.summary(), before);
        assert_eq!(search.summary(), before);
        assert_eq!(
            before.as_deref(),
            Some("Results for: Physician ID 101 Messages before or on 2024-03-10")
        );
    }

    #[test]
    fn test_superseded_search_discarded() {
        let mut search = MessageSearch::default();
        search.set_physician_id("101");
        let first = search.search().unwrap();
        search.set_physician_id("202");
        let second = search.search().unwrap();

        assert!(search.apply_results(second.generation(), Ok(vec![record(2, 202)])));
        assert!(!search.apply_results(first.generation(), Ok(vec![record(1, 101)])));

        assert_eq!(search.messages().len(), 1);
        assert_eq!(search.messages()[0].message_id, MessageId(2));
        assert_eq!(search.snapshot().unwrap().physician_id, "202");
    }

    #[test]
    fn test_superseded_failure_discarded() {
        let mut search = MessageSearch::default();
        let first = search.search().unwrap();
        let second = search.search().unwrap();
        search.apply_results(second.generation(), Ok(vec![record(5, 1)]));

        assert!(!search.apply_results(first.generation(), Err("timeout".into())));
        assert_eq!(search.phase(), &SearchPhase::Results);
        assert!(search.snapshot().is_some());
    }

    #[test]
    fn test_new_search_clears_outcomes() {
        let mut search = loaded(&[1, 2]);
        let ticket = search.classify(MessageId(1)).unwrap();
        search.apply_classification(ticket, Ok(classified(1, vec![])));
        let pending = search.classify(MessageId(2)).unwrap();

        let next = search.search().unwrap();
        assert!(search.messages().is_empty());
        assert_eq!(
            search.classification_status(MessageId(1)),
            &ClassificationStatus::NotStarted
        );

        // The old in-flight request resolves after the new search was issued.
        assert!(!search.apply_classification(pending, Ok(classified(2, vec![]))));
        search.apply_results(next.generation(), Ok(vec![record(2, 101)]));
        assert_eq!(
            search.classification_status(MessageId(2)),
            &ClassificationStatus::NotStarted
        );
    }

    #[test]
    fn test_classify_unknown_message() {
        let mut search = loaded(&[1]);
        assert_eq!(
            search.classify(MessageId(99)),
            Err(ClassifyRejection::UnknownMessage(MessageId(99)))
        );
    }

    #[test]
    fn test_classification_isolation() {
        let mut search = loaded(&[1, 2]);
        let b = search.classify(MessageId(2)).unwrap();
        search.apply_classification(b, Ok(classified(2, vec![])));
        let b_before = search.classification_status(MessageId(2)).clone();

        let a = search.classify(MessageId(1)).unwrap();
        search.apply_classification(a, Err("status 502".into()));

        assert_eq!(search.classification_status(MessageId(2)), &b_before);
        assert_eq!(search.messages().len(), 2);
        assert_eq!(search.phase(), &SearchPhase::Results);

        assert!(search.reset_classification(MessageId(2)));
        assert!(search.classify(MessageId(2)).is_ok());
    }

    #[test]
    fn test_seed_only_touches_physician_field() {
        let mut search = MessageSearch::default();
        search.set_start_date("2024-01-");
        search.seed_physician_id(PhysicianId(101));
        assert_eq!(search.filter().physician_id, "101");
        assert_eq!(search.filter().start_date, "2024-01-");
    }
}
