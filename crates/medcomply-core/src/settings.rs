//! Application settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use medcomply_api::ApiClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the configured base URL.
pub const API_URL_ENV: &str = "MEDCOMPLY_API_URL";

/// Persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the physician/message/classification service.
    pub api_base_url: String,
    /// Rule-set version to request on classify calls.
    pub compliance_version: Option<String>,
    /// Transport timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            compliance_version: None,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Location of the settings file.
    #[must_use]
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("medcomply")
            .join("settings.json")
    }

    /// Loads settings from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()).await
    }

    /// Loads settings from `path`, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let settings: Self = serde_json::from_str(&contents)?;
        info!("Settings loaded from {:?}", path);
        Ok(settings)
    }

    /// Applies a base URL override, typically read from [`API_URL_ENV`].
    /// Blank values are ignored.
    #[must_use]
    pub fn with_env_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            debug!("Base URL overridden by environment: {}", url);
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    /// Builds the service client described by these settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the base URL is invalid or the client cannot
    /// be built, and [`Error::Config`] for a zero timeout.
    pub fn client(&self) -> Result<ApiClient> {
        let mut client = ApiClient::new(&self.api_base_url)?;
        if let Some(secs) = self.request_timeout_secs {
            if secs == 0 {
                return Err(Error::Config(
                    "request_timeout_secs must be greater than zero".to_string(),
                ));
            }
            client = client.with_timeout(Duration::from_secs(secs))?;
        }
        if let Some(version) = &self.compliance_version {
            client = client.with_compliance_version(version.clone());
        }
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("medcomply-settings-{}-{name}", std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert!(settings.compliance_version.is_none());
        assert!(settings.client().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"compliance_version":"v2"}"#).unwrap();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.compliance_version.as_deref(), Some("v2"));
    }

    #[test]
    fn test_env_override() {
        let settings = Settings::default().with_env_override(Some("http://api.internal:9000".into()));
        assert_eq!(settings.api_base_url, "http://api.internal:9000");

        let settings = Settings::default().with_env_override(Some("  ".into()));
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_client_rejects_bad_values() {
        let settings = Settings {
            api_base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(matches!(settings.client(), Err(Error::Api(_))));

        let settings = Settings {
            request_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert!(matches!(settings.client(), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let settings = Settings::load_from(&temp_path("missing")).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = temp_path("load");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(
            &path,
            r#"{"api_base_url":"http://example.test","compliance_version":"2024-01","request_timeout_secs":15}"#,
        )
        .await
        .unwrap();

        let loaded = Settings::load_from(&path).await.unwrap();
        assert_eq!(
            loaded,
            Settings {
                api_base_url: "http://example.test".into(),
                compliance_version: Some("2024-01".into()),
                request_timeout_secs: Some(15),
            }
        );
        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let path = temp_path("malformed");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert!(matches!(Settings::load_from(&path).await, Err(Error::Serde(_))));
        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
