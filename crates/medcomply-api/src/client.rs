//! HTTP client for the directory, message store, and classification engine.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::model::{ClassifyRequest, ClassifyResponse, MessageId, MessageRecord, Physician};
use crate::query::{MessageQuery, PhysicianQuery};

/// Client for the read and classify APIs.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL, always ending in `/`.
    base_url: Url,
    /// Compliance rule set override sent with every classify request.
    compliance_version: Option<String>,
    /// HTTP client.
    http_client: Client,
}

impl ApiClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot carry a path.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base(base_url.as_ref())?,
            compliance_version: None,
            http_client: Client::new(),
        })
    }

    /// Sets a transport timeout for every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Pins classify requests to a compliance rule set.
    #[must_use]
    pub fn with_compliance_version(mut self, version: impl Into<String>) -> Self {
        self.compliance_version = Some(version.into());
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for `GET /physicians`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn physicians_url(&self, query: &PhysicianQuery) -> Result<Url> {
        self.endpoint("physicians", &query.to_pairs())
    }

    /// URL for `GET /messages`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn messages_url(&self, query: &MessageQuery) -> Result<Url> {
        self.endpoint("messages", &query.to_pairs())
    }

    /// URL for `POST /classify/{message_id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn classify_url(&self, message_id: MessageId) -> Result<Url> {
        self.endpoint(&format!("classify/{message_id}"), &[])
    }

    /// Searches the physician directory.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    pub async fn fetch_physicians(&self, query: &PhysicianQuery) -> Result<Vec<Physician>> {
        let url = self.physicians_url(query)?;
        debug!("GET {}", url);
        let response = self.http_client.get(url).send().await?;
        decode(response).await
    }

    /// Searches the message store.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    pub async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<MessageRecord>> {
        let url = self.messages_url(query)?;
        debug!("GET {}", url);
        let response = self.http_client.get(url).send().await?;
        decode(response).await
    }

    /// Classifies one message against the compliance rule set.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status (including
    /// 404 for unknown messages), or an undecodable body.
    pub async fn classify_message(&self, message_id: MessageId) -> Result<ClassifyResponse> {
        let url = self.classify_url(message_id)?;
        let body = self
            .compliance_version
            .as_ref()
            .map_or_else(ClassifyRequest::default, ClassifyRequest::with_version);
        debug!("POST {}", url);
        let response = self.http_client.post(url).json(&body).send().await?;
        decode(response).await
    }

    fn endpoint(&self, path: &str, pairs: &[(&'static str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

/// Decodes a success body; any other status is an opaque failure.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status));
    }
    let body = response.bytes().await?;
    parse_body(&body)
}

/// Parses a JSON body. A malformed body is `Error::Json`, not a transport error.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
