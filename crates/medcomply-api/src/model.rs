//! Wire types for the directory, message store, and classification engine.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used by the message store.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Unique identifier for a physician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicianId(pub i64);

impl fmt::Display for PhysicianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physician record from the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Physician {
    /// Directory identifier.
    pub physician_id: PhysicianId,
    /// National Provider Identifier.
    pub npi: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Medical specialty (e.g. "Oncology").
    pub specialty: String,
    /// Two-letter state code.
    pub state: String,
    /// Whether the physician consented to outreach.
    pub consent_opt_in: bool,
    /// Preferred contact channel.
    pub preferred_channel: String,
}

impl Physician {
    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// One-line label used in result lists: `101 Jane Doe (Oncology | NY)`.
    #[must_use]
    pub fn list_label(&self) -> String {
        format!(
            "{} {} ({} | {})",
            self.physician_id,
            self.full_name(),
            self.specialty,
            self.state
        )
    }
}

/// A message from the message store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Message identifier.
    pub message_id: MessageId,
    /// Physician this message belongs to.
    pub physician_id: PhysicianId,
    /// Delivery channel (e.g. "email", "sms").
    pub channel: String,
    /// "inbound" or "outbound".
    pub direction: String,
    /// Timestamp as sent by the store, `YYYY-MM-DDTHH:MM:SS`.
    pub timestamp: String,
    /// Message body.
    pub message_text: String,
    /// Campaign the message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    /// Topic label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Compliance tag assigned upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_tag: Option<String>,
    /// Sentiment label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Delivery status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    /// Response latency in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_latency_sec: Option<f64>,
}

impl MessageRecord {
    /// Parses the store timestamp.
    ///
    /// Returns `None` when the store sent something other than
    /// `YYYY-MM-DDTHH:MM:SS`.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

/// Body of `POST /classify/{message_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Compliance rule set to classify against. The engine default applies
    /// when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_version: Option<String>,
}

impl ClassifyRequest {
    /// Creates a request pinned to a compliance version.
    #[must_use]
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            compliance_version: Some(version.into()),
        }
    }
}

/// A rule the classification engine matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRule {
    /// Rule identifier (e.g. "R-004").
    pub id: String,
    /// Rule name.
    pub name: String,
    /// Result category.
    pub result_type: String,
    /// Human-readable result.
    pub result_text: String,
    /// Keywords from the message that triggered the rule.
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}

/// Response of `POST /classify/{message_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Classified message.
    pub message_id: MessageId,
    /// Text the engine classified.
    pub message_text: String,
    /// Compliance rule set used.
    pub compliance_version: String,
    /// Matched rules, in engine order.
    #[serde(default)]
    pub matched_rules: Vec<MatchedRule>,
}

impl ClassifyResponse {
    /// Returns true when no rule was triggered.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.matched_rules.is_empty()
    }
}
