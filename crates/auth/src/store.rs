//! The privilege store: session accessors plus the lazily loaded privilege set.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::{
    AuthError, GuardCheck, IdentitySession, PrivilegeSet, PrivilegeSource, SessionStorage,
    UserProfile,
};

/// Whether the privilege set has been fetched for the current session.
///
/// `Loaded` with an empty set means "nothing granted"; both states answer
/// `false` to every predicate, but only `NotLoaded` triggers a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PrivilegeState {
    #[default]
    NotLoaded,
    Loaded(PrivilegeSet),
}

impl PrivilegeState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn set(&self) -> Option<&PrivilegeSet> {
        match self {
            Self::Loaded(set) => Some(set),
            Self::NotLoaded => None,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    /// Bumped on login/logout; a load started under an older value is dropped.
    generation: u64,
    state: PrivilegeState,
}

/// Owner of the identity session and its privileges.
///
/// Reads of the session always go through [`SessionStorage`]. Privilege loads
/// are single-flight: concurrent callers of
/// [`ensure_privileges_loaded`](Self::ensure_privileges_loaded) share one
/// backend call.
pub struct PrivilegeStore {
    storage: Arc<dyn SessionStorage>,
    source: Arc<dyn PrivilegeSource>,
    slot: RwLock<Slot>,
    load_lock: Mutex<()>,
}

impl core::fmt::Debug for PrivilegeStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrivilegeStore")
            .field("state", &self.privileges())
            .finish_non_exhaustive()
    }
}

impl PrivilegeStore {
    pub fn new(storage: Arc<dyn SessionStorage>, source: Arc<dyn PrivilegeSource>) -> Self {
        Self {
            storage,
            source,
            slot: RwLock::new(Slot::default()),
            load_lock: Mutex::new(()),
        }
    }

    /// Current session, if storage holds an authenticated one.
    pub fn session(&self) -> Option<IdentitySession> {
        match self.storage.load() {
            Ok(session) => session.filter(IdentitySession::is_authenticated),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session storage; treating as logged out");
                None
            }
        }
    }

    pub fn is_logged(&self) -> bool {
        self.session().is_some()
    }

    pub fn user_profile(&self) -> Option<UserProfile> {
        self.session().map(|s| s.profile)
    }

    /// Snapshot of the privilege state.
    pub fn privileges(&self) -> PrivilegeState {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .is_loaded()
    }

    /// Persist a fresh session and forget any privileges of the previous one.
    pub fn login(&self, session: IdentitySession) -> Result<(), AuthError> {
        self.storage.save(&session)?;
        self.reset();
        tracing::info!(user_id = %session.profile.id, "session started");
        Ok(())
    }

    /// Drop the session and its privileges.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.storage.clear()?;
        self.reset();
        tracing::info!("session ended");
        Ok(())
    }

    fn reset(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = PrivilegeState::NotLoaded;
    }

    /// Load privileges unless they already are.
    ///
    /// Callers that arrive while a load is in flight wait for it and then
    /// return without fetching again.
    pub async fn ensure_privileges_loaded(&self) -> Result<(), AuthError> {
        if self.is_loaded() {
            return Ok(());
        }
        let _guard = self.load_lock.lock().await;
        if self.is_loaded() {
            return Ok(());
        }
        self.load_locked().await
    }

    /// Unconditionally re-fetch privileges for the current session.
    ///
    /// On failure the previous state is left as it was.
    pub async fn fetch_user_privileges(&self) -> Result<(), AuthError> {
        let _guard = self.load_lock.lock().await;
        self.load_locked().await
    }

    async fn load_locked(&self) -> Result<(), AuthError> {
        let generation = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation;
        let session = self.session().ok_or(AuthError::NotLoggedIn)?;

        tracing::debug!(user_id = %session.profile.id, "fetching privileges");
        let set = self.source.fetch(&session).await?;

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            tracing::debug!(user_id = %session.profile.id, "session changed during privilege load; discarding result");
            return Ok(());
        }
        tracing::debug!(
            privileges = set.privileges.len(),
            roles = set.roles.len(),
            "privileges loaded"
        );
        slot.state = PrivilegeState::Loaded(set);
        Ok(())
    }
}

impl GuardCheck for PrivilegeStore {
    fn has_privilege(&self, name: &str) -> bool {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.state.set().is_some_and(|set| set.has_privilege(name))
    }

    fn has_role(&self, name: &str) -> bool {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.state.set().is_some_and(|set| set.has_role(name))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use examdesk_core::UserId;

    use super::*;
    use crate::testing::{ScriptedPrivilegeSource, plain_profile, session_for, store_with};
    use crate::{AccessGuard, AuthToken, InMemorySessionStorage, Privilege, Role};

    fn grants() -> PrivilegeSet {
        PrivilegeSet::new([Privilege::new("subjects.view")], [Role::new("teacher")])
    }

    fn logged_in_store(source: Arc<ScriptedPrivilegeSource>) -> PrivilegeStore {
        store_with(Some(session_for(plain_profile(1))), source)
    }

    #[test]
    fn predicates_are_false_before_load() {
        let store = logged_in_store(ScriptedPrivilegeSource::granting(grants()));
        assert!(store.is_logged());
        assert!(!store.is_loaded());
        assert!(!store.has_privilege("subjects.view"));
        assert!(!store.has_role("teacher"));
        assert!(store.satisfies(&AccessGuard::Open));
    }

    #[test]
    fn blank_token_is_logged_out() {
        let storage = Arc::new(InMemorySessionStorage::with_session(IdentitySession::new(
            AuthToken::new(""),
            plain_profile(1),
        )));
        let store = PrivilegeStore::new(storage, ScriptedPrivilegeSource::granting(grants()));
        assert!(!store.is_logged());
        assert!(store.user_profile().is_none());
    }

    #[tokio::test]
    async fn load_populates_predicates() {
        let source = ScriptedPrivilegeSource::granting(grants());
        let store = logged_in_store(source.clone());

        store.ensure_privileges_loaded().await.unwrap();
        assert!(store.is_loaded());
        assert!(store.has_privilege("subjects.view"));
        assert!(store.has_role("teacher"));

        // Already loaded: no second call.
        store.ensure_privileges_loaded().await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn loaded_empty_is_distinct_from_not_loaded() {
        let source = ScriptedPrivilegeSource::granting(PrivilegeSet::default());
        let store = logged_in_store(source.clone());

        store.ensure_privileges_loaded().await.unwrap();
        assert_eq!(store.privileges(), PrivilegeState::Loaded(PrivilegeSet::default()));
        assert!(!store.has_privilege("subjects.view"));

        store.ensure_privileges_loaded().await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_untouched() {
        let source = ScriptedPrivilegeSource::granting(grants());
        let store = logged_in_store(source.clone());
        store.ensure_privileges_loaded().await.unwrap();

        source.set_result(Err(AuthError::privilege_load("503")));
        let err = store.fetch_user_privileges().await.unwrap_err();
        assert_eq!(err, AuthError::PrivilegeLoad("503".into()));
        assert_eq!(store.privileges(), PrivilegeState::Loaded(grants()));
    }

    #[tokio::test]
    async fn refetch_replaces_the_whole_set() {
        let source = ScriptedPrivilegeSource::granting(grants());
        let store = logged_in_store(source.clone());
        store.ensure_privileges_loaded().await.unwrap();

        source.set_result(Ok(PrivilegeSet::new([Privilege::new("zones.view")], [])));
        store.fetch_user_privileges().await.unwrap();
        assert!(store.has_privilege("zones.view"));
        assert!(!store.has_privilege("subjects.view"));
        assert!(!store.has_role("teacher"));
    }

    #[tokio::test]
    async fn load_without_session_is_rejected() {
        let store = store_with(None, ScriptedPrivilegeSource::granting(grants()));
        assert_eq!(store.ensure_privileges_loaded().await, Err(AuthError::NotLoggedIn));
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_fetch() {
        let source = ScriptedPrivilegeSource::held(Ok(grants()));
        let store = Arc::new(logged_in_store(source.clone()));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.ensure_privileges_loaded().await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.ensure_privileges_loaded().await }
        });

        while source.calls() == 0 {
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        source.release(1);

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
        assert_eq!(source.calls(), 1);
        assert!(store.has_role("teacher"));
    }

    #[tokio::test]
    async fn stale_load_is_discarded_after_relogin() {
        let source = ScriptedPrivilegeSource::held(Ok(grants()));
        let store = Arc::new(logged_in_store(source.clone()));

        let load = tokio::spawn({
            let store = store.clone();
            async move { store.ensure_privileges_loaded().await }
        });
        while source.calls() == 0 {
            tokio::task::yield_now().await;
        }

        store.logout().unwrap();
        store.login(session_for(plain_profile(2))).unwrap();
        source.release(1);
        load.await.unwrap().unwrap();

        assert_eq!(store.privileges(), PrivilegeState::NotLoaded);
        assert_eq!(store.user_profile().unwrap().id, UserId::new(2));
    }

    #[tokio::test]
    async fn logout_forgets_privileges() {
        let store = logged_in_store(ScriptedPrivilegeSource::granting(grants()));
        store.ensure_privileges_loaded().await.unwrap();

        store.logout().unwrap();
        assert!(!store.is_logged());
        assert!(!store.is_loaded());
        assert!(!store.has_privilege("subjects.view"));
    }
}
