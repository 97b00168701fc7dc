//! Ordered guard evaluation for a navigation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;

use examdesk_auth::PrivilegeStore;
use examdesk_core::CurrentRoute;
use examdesk_navigation::{AccessiblePageResolver, route_from_path, static_navigation};

use crate::{
    AssignmentGuard, AuthenticationGuard, Decision, GuardConfig, GuardError, Navigation,
    NavigationRoutePolicy, RouteAccessPolicy,
};

/// One step of the navigation check.
#[async_trait]
pub trait Guard: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn check(&self, store: &PrivilegeStore, navigation: &Navigation) -> Decision;
}

/// Guards run in registration order; the first redirect wins and the rest
/// are skipped.
#[derive(Clone)]
pub struct GuardPipeline {
    guards: Vec<Arc<dyn Guard>>,
    max_redirects: usize,
}

impl core::fmt::Debug for GuardPipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GuardPipeline")
            .field("guards", &self.guard_names())
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}

impl GuardPipeline {
    pub fn new(max_redirects: usize) -> Self {
        Self {
            guards: Vec::new(),
            max_redirects,
        }
    }

    pub fn with_guard(mut self, guard: Arc<dyn Guard>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Authentication guard, then assignment guard.
    pub fn standard(
        config: GuardConfig,
        resolver: AccessiblePageResolver,
        policy: Arc<dyn RouteAccessPolicy>,
    ) -> Self {
        let config = Arc::new(config);
        let resolver = Arc::new(resolver);
        Self::new(config.max_redirects)
            .with_guard(Arc::new(AuthenticationGuard::new(
                config.clone(),
                resolver.clone(),
                policy,
            )))
            .with_guard(Arc::new(AssignmentGuard::new(config, resolver)))
    }

    /// Standard pipeline over the static navigation table, landing on
    /// `config.fallback_route` when nothing is accessible.
    pub fn from_config(config: GuardConfig) -> Self {
        let resolver = AccessiblePageResolver::new(static_navigation(), config.fallback_route.clone());
        let policy = NavigationRoutePolicy::from_table(resolver.table());
        Self::standard(config, resolver, Arc::new(policy))
    }

    pub fn guard_names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Evaluate one navigation.
    pub async fn run(&self, store: &PrivilegeStore, navigation: &Navigation) -> Decision {
        let span = tracing::info_span!(
            "navigation",
            id = %navigation.id,
            from = navigation.from_path(),
            to = navigation.to_path(),
        );
        async {
            for guard in &self.guards {
                let decision = guard.check(store, navigation).await;
                if let Decision::Redirect(target) = &decision {
                    tracing::debug!(guard = guard.name(), target = %target, "redirecting");
                    return decision;
                }
            }
            tracing::trace!("proceeding");
            Decision::Proceed
        }
        .instrument(span)
        .await
    }

    /// Follow redirects from `to` until every guard lets the navigation
    /// through, and return the route that was finally admitted.
    ///
    /// Each hop keeps the original `from`, as a router does when a guard
    /// redirects mid-navigation.
    pub async fn settle(
        &self,
        store: &PrivilegeStore,
        from: CurrentRoute,
        to: CurrentRoute,
    ) -> Result<CurrentRoute, GuardError> {
        let mut target = to;
        let mut hops = 0;
        loop {
            let navigation = Navigation::new(from.clone(), target.clone());
            match self.run(store, &navigation).await {
                Decision::Proceed => return Ok(target),
                Decision::Redirect(next) => {
                    hops += 1;
                    if hops > self.max_redirects {
                        tracing::error!(hops, last = %next, "navigation does not settle");
                        return Err(GuardError::RedirectLoop { hops, last: next });
                    }
                    target = route_from_path(&next);
                }
            }
        }
    }
}
