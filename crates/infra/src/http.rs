//! Privilege source backed by the REST API.

use anyhow::{Context, bail};
use async_trait::async_trait;

use examdesk_auth::{AuthError, IdentitySession, PrivilegeSet, PrivilegeSource};

use crate::BackendConfig;

/// Fetches `GET {api_base_url}{privileges_path}` with the session's bearer token.
#[derive(Debug, Clone)]
pub struct HttpPrivilegeSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPrivilegeSource {
    pub fn new(config: &BackendConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| AuthError::privilege_load(format!("http client: {e}")))?;
        Ok(Self::with_client(client, config.privileges_url()))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, session: &IdentitySession) -> anyhow::Result<PrivilegeSet> {
        let res = self
            .client
            .get(&self.url)
            .bearer_auth(session.token.as_str())
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            bail!("GET {} returned {status}: {}", self.url, body.trim());
        }

        res.json::<PrivilegeSet>()
            .await
            .context("decoding privileges payload")
    }
}

#[async_trait]
impl PrivilegeSource for HttpPrivilegeSource {
    async fn fetch(&self, session: &IdentitySession) -> Result<PrivilegeSet, AuthError> {
        match self.request(session).await {
            Ok(set) => Ok(set),
            Err(err) => {
                tracing::warn!(user_id = %session.profile.id, error = %format!("{err:#}"), "privileges request failed");
                Err(AuthError::privilege_load(format!("{err:#}")))
            }
        }
    }
}
