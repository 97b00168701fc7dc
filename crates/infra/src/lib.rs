//! `examdesk-infra` — backend adapters for the privilege store.

pub mod config;
pub mod file_session;
pub mod http;

use std::sync::Arc;

use examdesk_auth::{AuthError, PrivilegeStore};

pub use config::BackendConfig;
pub use file_session::FileSessionStorage;
pub use http::HttpPrivilegeSource;

/// Store wired to the HTTP privileges endpoint and the on-disk session file.
pub fn privilege_store(config: &BackendConfig) -> Result<PrivilegeStore, AuthError> {
    let source = HttpPrivilegeSource::new(config)?;
    let storage = FileSessionStorage::new(config.session_file.clone());
    tracing::info!(
        privileges_url = source.url(),
        session_file = %storage.path().display(),
        "privilege store configured"
    );
    Ok(PrivilegeStore::new(Arc::new(storage), Arc::new(source)))
}
