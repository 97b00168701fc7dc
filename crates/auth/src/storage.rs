//! Client-side persistence of the identity session.

use std::sync::{PoisonError, RwLock};

use crate::{AuthError, IdentitySession};

/// Where the session lives between page loads.
///
/// Implementations must be cheap to read: the store re-reads on every
/// `is_logged` / `user_profile` call.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<IdentitySession>, AuthError>;

    fn save(&self, session: &IdentitySession) -> Result<(), AuthError>;

    fn clear(&self) -> Result<(), AuthError>;
}

/// In-memory storage for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    session: RwLock<Option<IdentitySession>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: IdentitySession) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn load(&self) -> Result<Option<IdentitySession>, AuthError> {
        Ok(self
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &IdentitySession) -> Result<(), AuthError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
