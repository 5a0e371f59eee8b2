//! Translation of user-facing filters into read API query parameters.
//!
//! The message store compares timestamps against the `end_date` parameter
//! on a date boundary, so a user-selected end date is shifted forward by
//! one day before encoding. Selecting `2024-03-10` therefore yields
//! `end_date=2024-03-11` and matches everything stamped on the 10th.

use std::num::IntErrorKind;

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::model::PhysicianId;

/// Calendar date format used on the wire and in date inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation failure detected before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Physician id text is not an integer.
    #[error("Invalid identifier")]
    InvalidIdentifier(String),

    /// Physician id is an integer outside the 64-bit id space.
    #[error("Identifier out of range")]
    IdentifierOutOfRange(String),

    /// Date text is not `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// End date cannot be advanced past the last representable day.
    #[error("End date is out of range")]
    DateOutOfRange,
}

impl QueryError {
    /// Get the human-readable message shown next to the filter controls.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "Invalid Physician ID.",
            Self::IdentifierOutOfRange(_) => "Physician ID is out of range.",
            Self::InvalidDate(_) => "Invalid date, expected YYYY-MM-DD.",
            Self::DateOutOfRange => "End date is out of range.",
        }
    }
}

/// Parses a date input field. Blank input means "no bound".
///
/// # Errors
///
/// Returns `QueryError::InvalidDate` if non-blank text is not `YYYY-MM-DD`.
pub fn parse_date_input(text: &str) -> Result<Option<NaiveDate>, QueryError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| QueryError::InvalidDate(trimmed.to_string()))
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parameters for `GET /physicians`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhysicianQuery {
    /// State filter, `None` when blank.
    pub state: Option<String>,
    /// Specialty filter, `None` when blank.
    pub specialty: Option<String>,
}

impl PhysicianQuery {
    /// Builds a query from raw input; blank filters are dropped.
    #[must_use]
    pub fn new(state: &str, specialty: &str) -> Self {
        Self {
            state: non_blank(state),
            specialty: non_blank(specialty),
        }
    }

    /// Query pairs in wire order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(state) = &self.state {
            pairs.push(("state", state.clone()));
        }
        if let Some(specialty) = &self.specialty {
            pairs.push(("specialty", specialty.clone()));
        }
        pairs
    }

    /// URL-encoded query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_pairs())
    }
}

/// Parameters for `GET /messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    /// Physician scope.
    pub physician_id: Option<PhysicianId>,
    /// Inclusive lower bound.
    pub start_date: Option<NaiveDate>,
    /// Exclusive upper bound: the user's end date plus one day.
    pub end_date: Option<NaiveDate>,
}

impl MessageQuery {
    /// Translates the message search filter.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidIdentifier` if `physician_id_text` is
    /// non-blank and not an integer, `QueryError::IdentifierOutOfRange` if it
    /// is an integer that does not fit in 64 bits, or `QueryError::DateOutOfRange` if the
    /// end date has no following day.
    pub fn translate(
        physician_id_text: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, QueryError> {
        let trimmed = physician_id_text.trim();
        let physician_id = if trimmed.is_empty() {
            None
        } else {
            let id = trimmed.parse::<i64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    QueryError::IdentifierOutOfRange(trimmed.to_string())
                }
                _ => QueryError::InvalidIdentifier(trimmed.to_string()),
            })?;
            Some(PhysicianId(id))
        };

        let end_date = end_date
            .map(|date| date.succ_opt().ok_or(QueryError::DateOutOfRange))
            .transpose()?;

        Ok(Self {
            physician_id,
            start_date,
            end_date,
        })
    }

    /// Query pairs in wire order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.physician_id {
            pairs.push(("physician_id", id.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", format_date(start)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", format_date(end)));
        }
        pairs
    }

    /// URL-encoded query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_pairs())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn encode_pairs(pairs: &[(&'static str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}
