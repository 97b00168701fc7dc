//! Fixed-assignment guard: keeps hall- and center-bound identities inside
//! their scope.

use std::sync::Arc;

use async_trait::async_trait;

use examdesk_auth::PrivilegeStore;
use examdesk_core::is_within_prefix;
use examdesk_navigation::AccessiblePageResolver;

use crate::{Decision, Guard, GuardConfig, Navigation};

pub struct AssignmentGuard {
    config: Arc<GuardConfig>,
    resolver: Arc<AccessiblePageResolver>,
}

impl AssignmentGuard {
    pub fn new(config: Arc<GuardConfig>, resolver: Arc<AccessiblePageResolver>) -> Self {
        Self { config, resolver }
    }
}

#[async_trait]
impl Guard for AssignmentGuard {
    fn name(&self) -> &'static str {
        "assignment"
    }

    async fn check(&self, store: &PrivilegeStore, navigation: &Navigation) -> Decision {
        let to = navigation.to_path();
        if self.config.is_auth_page(to) {
            return Decision::Proceed;
        }
        // Anonymous navigations are the authentication guard's business.
        let Some(profile) = store.user_profile() else {
            return Decision::Proceed;
        };

        if !store.is_loaded() {
            if let Err(err) = store.ensure_privileges_loaded().await {
                tracing::warn!(user_id = %profile.id, error = %err, "privilege load failed; letting navigation through");
                return Decision::Proceed;
            }
        }

        if let Some(assignment) = profile.fixed_assignment() {
            if is_within_prefix(to, &assignment.scope_prefix()) {
                return Decision::Proceed;
            }
            let landing = assignment.landing_route();
            tracing::debug!(user_id = %profile.id, left = to, landing = %landing, "outside fixed assignment");
            return Decision::redirect(landing);
        }

        if navigation.is_post_login_landing(&self.config.login_route) {
            return Decision::redirect(self.resolver.find_first_accessible_page(store).await);
        }
        Decision::Proceed
    }
}
