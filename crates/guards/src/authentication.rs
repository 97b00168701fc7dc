//! Authentication and page-access guard.
//!
//! Runs first. Sends anonymous users to the login page, lands fresh logins
//! on their first accessible page and keeps users off routes they lack the
//! privileges for.

use std::sync::Arc;

use async_trait::async_trait;

use examdesk_auth::{GuardCheck, PrivilegeStore, UserProfile};
use examdesk_core::is_within_prefix;
use examdesk_navigation::AccessiblePageResolver;

use crate::{Decision, Guard, GuardConfig, Navigation, RouteAccessPolicy};

pub struct AuthenticationGuard {
    config: Arc<GuardConfig>,
    resolver: Arc<AccessiblePageResolver>,
    policy: Arc<dyn RouteAccessPolicy>,
}

impl AuthenticationGuard {
    pub fn new(
        config: Arc<GuardConfig>,
        resolver: Arc<AccessiblePageResolver>,
        policy: Arc<dyn RouteAccessPolicy>,
    ) -> Self {
        Self {
            config,
            resolver,
            policy,
        }
    }

    fn is_allowed(&self, store: &PrivilegeStore, profile: &UserProfile, path: &str) -> bool {
        // An identity bound to a center or hall may always open its own scope.
        let in_own_scope = profile
            .fixed_assignment()
            .is_some_and(|assignment| is_within_prefix(path, &assignment.scope_prefix()));
        in_own_scope || store.satisfies(&self.policy.required_guard(path))
    }
}

#[async_trait]
impl Guard for AuthenticationGuard {
    fn name(&self) -> &'static str {
        "authentication"
    }

    async fn check(&self, store: &PrivilegeStore, navigation: &Navigation) -> Decision {
        let to = navigation.to_path();
        if self.config.is_auth_page(to) {
            return Decision::Proceed;
        }

        let Some(profile) = store.user_profile() else {
            tracing::debug!("no session; sending to login");
            return Decision::redirect(self.config.login_route.as_str());
        };

        if let Err(err) = store.ensure_privileges_loaded().await {
            tracing::warn!(user_id = %profile.id, error = %err, "privilege load failed; letting navigation through");
            return Decision::Proceed;
        }

        if navigation.is_post_login_landing(&self.config.login_route) {
            return Decision::redirect(self.resolver.find_first_accessible_page(store).await);
        }

        if self.config.is_exempt(to) || self.is_allowed(store, &profile, to) {
            return Decision::Proceed;
        }

        let target = self.resolver.find_first_accessible_page(store).await;
        if target == to {
            return Decision::Proceed;
        }
        tracing::info!(user_id = %profile.id, denied = to, target = %target, "route not accessible");
        Decision::redirect(target)
    }
}

#[cfg(test)]
mod tests {
    use examdesk_auth::testing::{
        CountingSessionStorage, ScriptedPrivilegeSource, plain_profile, session_for, store_with,
    };
    use examdesk_auth::{Privilege, PrivilegeSet, PrivilegeSource};
    use examdesk_core::{ExamCenterId, HallId};

    use super::*;
    use crate::NavigationRoutePolicy;

    fn guard() -> AuthenticationGuard {
        let resolver = AccessiblePageResolver::default();
        let policy = NavigationRoutePolicy::from_table(resolver.table());
        AuthenticationGuard::new(Arc::new(GuardConfig::default()), Arc::new(resolver), Arc::new(policy))
    }

    fn granting(names: &[&'static str]) -> Arc<ScriptedPrivilegeSource> {
        ScriptedPrivilegeSource::granting(PrivilegeSet::new(
            names.iter().map(|n| Privilege::from_static(*n)),
            [],
        ))
    }

    fn logged_in(source: Arc<dyn PrivilegeSource>) -> PrivilegeStore {
        store_with(Some(session_for(plain_profile(1))), source)
    }

    #[tokio::test]
    async fn anonymous_users_go_to_login() {
        let store = store_with(None, granting(&[]));
        let decision = guard().check(&store, &Navigation::between("/", "/dashboard")).await;
        assert_eq!(decision, Decision::redirect("/login"));
    }

    #[tokio::test]
    async fn auth_pages_never_read_the_session() {
        let storage = CountingSessionStorage::new(None);
        let source = granting(&[]);
        let store = PrivilegeStore::new(storage.clone(), source.clone());

        for path in ["/login", "/register", "/account/login-help"] {
            let decision = guard().check(&store, &Navigation::between("/", path)).await;
            assert_eq!(decision, Decision::Proceed);
        }
        assert_eq!(storage.loads(), 0);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn post_login_lands_on_first_accessible_page() {
        let store = logged_in(granting(&["zones.view", "reports.view"]));
        let decision = guard().check(&store, &Navigation::between("/login", "/")).await;
        assert_eq!(decision, Decision::redirect("/zones"));
    }

    #[tokio::test]
    async fn permitted_route_proceeds() {
        let store = logged_in(granting(&["subjects.view"]));
        let decision = guard()
            .check(&store, &Navigation::between("/", "/subjects/4/edit"))
            .await;
        assert_eq!(decision, Decision::Proceed);
    }

    #[tokio::test]
    async fn forbidden_route_redirects_to_first_accessible_page() {
        let store = logged_in(granting(&["reports.view"]));
        let decision = guard().check(&store, &Navigation::between("/", "/payroll")).await;
        assert_eq!(decision, Decision::redirect("/reports"));
    }

    #[tokio::test]
    async fn fallback_and_access_denied_are_exempt() {
        let store = logged_in(granting(&[]));
        for path in ["/financial-dashboard", "/access-denied"] {
            let decision = guard().check(&store, &Navigation::between("/", path)).await;
            assert_eq!(decision, Decision::Proceed, "{path}");
        }
    }

    #[tokio::test]
    async fn load_failure_fails_open() {
        let store = logged_in(ScriptedPrivilegeSource::failing("backend down"));
        let decision = guard().check(&store, &Navigation::between("/", "/payroll")).await;
        assert_eq!(decision, Decision::Proceed);
        assert!(!store.is_loaded());
    }

    #[tokio::test]
    async fn assigned_users_may_open_their_own_scope() {
        let profile = plain_profile(5).with_hall(ExamCenterId::new(3), HallId::new(9));
        let store = store_with(Some(session_for(profile)), granting(&[]));
        let decision = guard()
            .check(&store, &Navigation::between("/", "/examination-centers/3/hall/9/seats"))
            .await;
        assert_eq!(decision, Decision::Proceed);

        let decision = guard()
            .check(&store, &Navigation::between("/", "/examination-centers/3/exams"))
            .await;
        assert_eq!(decision, Decision::redirect("/financial-dashboard"));
    }

    /// Guards `/subjects` regardless of what the navigation table says.
    struct SubjectsNeedPrivilege;

    impl RouteAccessPolicy for SubjectsNeedPrivilege {
        fn required_guard(&self, path: &str) -> examdesk_auth::AccessGuard {
            if is_within_prefix(path, "/subjects") {
                examdesk_auth::AccessGuard::privilege("subjects.view")
            } else {
                examdesk_auth::AccessGuard::Open
            }
        }
    }

    #[tokio::test]
    async fn redirect_to_the_denied_route_itself_is_suppressed() {
        let resolver = AccessiblePageResolver::new(
            vec![examdesk_navigation::NavigationEntry::link("Subjects", "i", "/subjects")],
            "/financial-dashboard",
        );
        let guard = AuthenticationGuard::new(
            Arc::new(GuardConfig::default()),
            Arc::new(resolver),
            Arc::new(SubjectsNeedPrivilege),
        );
        let store = logged_in(granting(&[]));

        let decision = guard.check(&store, &Navigation::between("/", "/subjects")).await;
        assert_eq!(decision, Decision::Proceed);

        let decision = guard.check(&store, &Navigation::between("/", "/subjects/2")).await;
        assert_eq!(decision, Decision::redirect("/subjects"));
    }
}
