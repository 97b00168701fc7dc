//! Test doubles for the privilege source and session storage.
//!
//! Used by this crate's tests and by downstream crates that need a
//! [`PrivilegeStore`] without a backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use examdesk_core::UserId;

use crate::{
    AuthError, AuthToken, IdentitySession, InMemorySessionStorage, PrivilegeSet, PrivilegeSource,
    PrivilegeStore, SessionStorage, UserProfile,
};

/// Privilege source with a scripted result and a call counter.
///
/// A source built with [`held`](Self::held) blocks every fetch until
/// [`release`](Self::release) hands out a permit, which lets tests keep a
/// load in flight.
#[derive(Debug)]
pub struct ScriptedPrivilegeSource {
    calls: AtomicUsize,
    result: RwLock<Result<PrivilegeSet, AuthError>>,
    gate: Option<Semaphore>,
}

impl ScriptedPrivilegeSource {
    pub fn new(result: Result<PrivilegeSet, AuthError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result: RwLock::new(result),
            gate: None,
        })
    }

    pub fn held(result: Result<PrivilegeSet, AuthError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result: RwLock::new(result),
            gate: Some(Semaphore::new(0)),
        })
    }

    pub fn granting(set: PrivilegeSet) -> Arc<Self> {
        Self::new(Ok(set))
    }

    pub fn failing(msg: &str) -> Arc<Self> {
        Self::new(Err(AuthError::privilege_load(msg)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Let `n` held fetches complete.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn set_result(&self, result: Result<PrivilegeSet, AuthError>) {
        *self.result.write().unwrap_or_else(PoisonError::into_inner) = result;
    }
}

#[async_trait]
impl PrivilegeSource for ScriptedPrivilegeSource {
    async fn fetch(&self, _session: &IdentitySession) -> Result<PrivilegeSet, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| AuthError::privilege_load("gate closed"))?
                .forget();
        }
        self.result
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Session storage that counts reads.
#[derive(Debug, Default)]
pub struct CountingSessionStorage {
    inner: InMemorySessionStorage,
    loads: AtomicUsize,
}

impl CountingSessionStorage {
    pub fn new(session: Option<IdentitySession>) -> Arc<Self> {
        let inner = match session {
            Some(session) => InMemorySessionStorage::with_session(session),
            None => InMemorySessionStorage::new(),
        };
        Arc::new(Self {
            inner,
            loads: AtomicUsize::new(0),
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl SessionStorage for CountingSessionStorage {
    fn load(&self) -> Result<Option<IdentitySession>, AuthError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load()
    }

    fn save(&self, session: &IdentitySession) -> Result<(), AuthError> {
        self.inner.save(session)
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.inner.clear()
    }
}

/// A logged-in session for `profile` with a throwaway token.
pub fn session_for(profile: UserProfile) -> IdentitySession {
    IdentitySession::new(AuthToken::new(format!("test-token-{}", profile.id)), profile)
}

/// Profile with no roles and no fixed assignment.
pub fn plain_profile(id: u64) -> UserProfile {
    UserProfile::new(UserId::new(id), format!("user-{id}"))
}

/// Store over an in-memory storage holding `session` (or nothing).
pub fn store_with(session: Option<IdentitySession>, source: Arc<dyn PrivilegeSource>) -> PrivilegeStore {
    let storage = match session {
        Some(session) => InMemorySessionStorage::with_session(session),
        None => InMemorySessionStorage::new(),
    };
    PrivilegeStore::new(Arc::new(storage), source)
}
