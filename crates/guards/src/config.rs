//! Guard configuration: reserved routes and loop limits.

use serde::{Deserialize, Serialize};

use examdesk_core::{DomainError, DomainResult, bare_path, reserved};

pub const ENV_LOGIN_ROUTE: &str = "EXAMDESK_LOGIN_ROUTE";
pub const ENV_ACCESS_DENIED_ROUTE: &str = "EXAMDESK_ACCESS_DENIED_ROUTE";
pub const ENV_FALLBACK_ROUTE: &str = "EXAMDESK_FALLBACK_ROUTE";
pub const ENV_MAX_REDIRECTS: &str = "EXAMDESK_MAX_REDIRECTS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub login_route: String,
    pub access_denied_route: String,
    /// Where the resolver lands when nothing else is accessible.
    pub fallback_route: String,
    /// Substrings that mark a path as an auth page ("login", "register").
    pub auth_page_markers: Vec<String>,
    pub max_redirects: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_route: reserved::LOGIN.to_string(),
            access_denied_route: reserved::ACCESS_DENIED.to_string(),
            fallback_route: reserved::FINANCIAL_DASHBOARD.to_string(),
            auth_page_markers: vec!["login".to_string(), "register".to_string()],
            max_redirects: 8,
        }
    }
}

impl GuardConfig {
    /// Defaults overridden by `EXAMDESK_*` environment variables.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `EXAMDESK_*` keys.
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(route) = lookup(ENV_LOGIN_ROUTE) {
            config.login_route = route;
        }
        if let Some(route) = lookup(ENV_ACCESS_DENIED_ROUTE) {
            config.access_denied_route = route;
        }
        if let Some(route) = lookup(ENV_FALLBACK_ROUTE) {
            config.fallback_route = route;
        }
        if let Some(raw) = lookup(ENV_MAX_REDIRECTS) {
            config.max_redirects = raw
                .trim()
                .parse()
                .map_err(|e| DomainError::validation(format!("{ENV_MAX_REDIRECTS}={raw:?}: {e}")))?;
        }
        config.validate()?;
        tracing::debug!(?config, "guard configuration loaded");
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> DomainResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("guard config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        for (name, route) in [
            ("login_route", &self.login_route),
            ("access_denied_route", &self.access_denied_route),
            ("fallback_route", &self.fallback_route),
        ] {
            if !route.starts_with('/') {
                return Err(DomainError::validation(format!(
                    "{name} must be an absolute path, got {route:?}"
                )));
            }
        }
        if self.max_redirects == 0 {
            return Err(DomainError::validation("max_redirects must be at least 1"));
        }
        if self.auth_page_markers.iter().any(|m| m.is_empty()) {
            return Err(DomainError::validation("auth page markers must not be empty"));
        }
        Ok(())
    }

    /// Loose substring match, so `/password-login-help` counts as an auth page too.
    pub fn is_auth_page(&self, path: &str) -> bool {
        self.auth_page_markers.iter().any(|marker| path.contains(marker.as_str()))
    }

    /// Routes excluded from the access check in the authentication guard.
    pub fn is_exempt(&self, path: &str) -> bool {
        let path = bare_path(path);
        path == self.access_denied_route || path == self.fallback_route || path == self.login_route
    }
}
