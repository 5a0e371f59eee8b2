//! Error types for API operations.

use reqwest::StatusCode;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection refused, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    ///
    /// The response body is never inspected.
    #[error("Request failed with status {0}")]
    Status(StatusCode),

    /// Response body is not the expected JSON, or a request body failed to encode.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Base URL cannot carry a path (e.g. `mailto:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::Status(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Request failed with status 404 Not Found");

        let err = Error::InvalidBaseUrl("mailto:x".into());
        assert_eq!(err.to_string(), "Invalid base URL: mailto:x");

        let err = Error::from(serde_json::from_str::<u8>("x").unwrap_err());
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
