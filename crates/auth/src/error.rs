use thiserror::Error;

/// Failures of the session/privilege layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The privileges endpoint failed (transport, status or payload).
    #[error("failed to load privileges: {0}")]
    PrivilegeLoad(String),

    /// Session storage could not be read or written.
    #[error("session storage error: {0}")]
    Storage(String),

    /// An operation needed a session and there is none.
    #[error("not logged in")]
    NotLoggedIn,
}

impl AuthError {
    pub fn privilege_load(msg: impl Into<String>) -> Self {
        Self::PrivilegeLoad(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
