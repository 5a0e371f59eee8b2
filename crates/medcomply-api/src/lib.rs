//! # medcomply-api
//!
//! Client library for the services behind the `MedComply` message classifier.
//!
//! ## Features
//!
//! - **Wire types**: physicians, message records, and classification results
//! - **Query translation**: user-facing filters to the read API's parameters,
//!   including the inclusive end-date adjustment
//! - **HTTP client**: directory search, message search, and per-message
//!   classification
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use medcomply_api::{ApiClient, MessageQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8000")?;
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 3, 1);
//!     let end = NaiveDate::from_ymd_opt(2024, 3, 10);
//!     let query = MessageQuery::translate("101", start, end)?;
//!
//!     for message in client.fetch_messages(&query).await? {
//!         let result = client.classify_message(message.message_id).await?;
//!         println!("{}: {} rule(s)", message.message_id, result.matched_rules.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
pub mod model;
pub mod query;

pub use client::ApiClient;
pub use error::{Error, Result};
pub use model::{
    ClassifyRequest, ClassifyResponse, MatchedRule, MessageId, MessageRecord, Physician,
    PhysicianId,
};
pub use query::{MessageQuery, PhysicianQuery, QueryError};
