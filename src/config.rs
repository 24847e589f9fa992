use crate::error::{CensysError, Result};
use std::env;
use std::time::Duration;

/// Base URL for the Censys REST API.
pub const DEFAULT_BASE_URL: &str = "https://www.censys.io/api/v1";

/// Default timeout for calls to the Censys REST API.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_ID_VAR: &str = "CENSYS_API_ID";
pub const API_SECRET_VAR: &str = "CENSYS_API_SECRET";
pub const API_URL_VAR: &str = "CENSYS_API_URL";
pub const TIMEOUT_VAR: &str = "CENSYS_TIMEOUT_SECS";

/// Connection settings shared by every API access object.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_id: Option<String>,
    pub api_secret: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_id: None,
            api_secret: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional: CENSYS_API_ID, CENSYS_API_SECRET (unset means no credentials)
    /// Optional: CENSYS_API_URL (defaults to the public v1 API)
    /// Optional: CENSYS_TIMEOUT_SECS (defaults to 30)
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = match env::var(TIMEOUT_VAR) {
            Ok(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                CensysError::Config(format!("Invalid {}: {}", TIMEOUT_VAR, raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self::default()
            .with_base_url(base_url)
            .with_credentials(env::var(API_ID_VAR).ok(), env::var(API_SECRET_VAR).ok())
            .with_timeout(timeout))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_credentials(mut self, api_id: Option<String>, api_secret: Option<String>) -> Self {
        self.api_id = api_id;
        self.api_secret = api_secret;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
