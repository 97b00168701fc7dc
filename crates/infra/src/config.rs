//! Backend connection settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use examdesk_core::{DomainError, DomainResult};

pub const ENV_API_BASE_URL: &str = "EXAMDESK_API_BASE_URL";
pub const ENV_PRIVILEGES_PATH: &str = "EXAMDESK_PRIVILEGES_PATH";
pub const ENV_HTTP_TIMEOUT_MS: &str = "EXAMDESK_HTTP_TIMEOUT_MS";
pub const ENV_SESSION_FILE: &str = "EXAMDESK_SESSION_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Scheme and host of the API, without a trailing slash.
    pub api_base_url: String,
    pub privileges_path: String,
    pub http_timeout_ms: u64,
    pub session_file: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            privileges_path: "/api/v1/me/privileges".to_string(),
            http_timeout_ms: 10_000,
            session_file: PathBuf::from(".examdesk/session.json"),
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        match lookup(ENV_API_BASE_URL) {
            Some(url) => config.api_base_url = url.trim_end_matches('/').to_string(),
            None => tracing::info!(default = %config.api_base_url, "{ENV_API_BASE_URL} not set; using default"),
        }
        if let Some(path) = lookup(ENV_PRIVILEGES_PATH) {
            config.privileges_path = path;
        }
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT_MS) {
            config.http_timeout_ms = raw
                .trim()
                .parse()
                .map_err(|e| DomainError::validation(format!("{ENV_HTTP_TIMEOUT_MS}={raw:?}: {e}")))?;
        }
        if let Some(path) = lookup(ENV_SESSION_FILE) {
            config.session_file = PathBuf::from(path);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(DomainError::validation(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        if !self.privileges_path.starts_with('/') {
            return Err(DomainError::validation("privileges_path must start with '/'"));
        }
        if self.http_timeout_ms == 0 {
            return Err(DomainError::validation("http_timeout_ms must be positive"));
        }
        Ok(())
    }

    pub fn privileges_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.privileges_path)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}
