use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserProfile;

/// Opaque bearer token issued by the login endpoint.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            f.write_str("AuthToken(<empty>)")
        } else {
            f.write_str("AuthToken(<redacted>)")
        }
    }
}

/// The persisted identity: token plus the profile decoded at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySession {
    pub token: AuthToken,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl IdentitySession {
    pub fn new(token: AuthToken, profile: UserProfile) -> Self {
        Self {
            token,
            profile,
            created_at: Utc::now(),
        }
    }

    /// A session only counts as logged in with a non-blank token.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}
