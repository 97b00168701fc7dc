//! First-accessible-page search over the static navigation table.

use std::sync::Arc;

use examdesk_auth::{GuardCheck, PrivilegeSet, PrivilegeStore};
use examdesk_core::reserved;

use crate::{NavigationEntry, static_navigation};

/// First route in `table` that `grants` may open.
///
/// Two levels only: a satisfied top-level entry with a route wins; a
/// satisfied entry without one is searched for its first satisfied child
/// with a route. Unsatisfied entries are skipped together with their children.
pub fn first_accessible_route<'a, G>(table: &'a [NavigationEntry], grants: &G) -> Option<&'a str>
where
    G: GuardCheck + ?Sized,
{
    for entry in table {
        if !grants.satisfies(&entry.guard) {
            continue;
        }
        if let Some(route) = entry.route() {
            return Some(route);
        }
        let child = entry
            .children
            .iter()
            .find(|child| grants.satisfies(&child.guard) && child.route().is_some());
        if let Some(route) = child.and_then(NavigationEntry::route) {
            return Some(route);
        }
    }
    None
}

/// Resolves the landing page for the current identity.
#[derive(Debug, Clone)]
pub struct AccessiblePageResolver {
    table: Arc<[NavigationEntry]>,
    fallback: String,
}

impl Default for AccessiblePageResolver {
    fn default() -> Self {
        Self::new(static_navigation(), reserved::FINANCIAL_DASHBOARD)
    }
}

impl AccessiblePageResolver {
    /// `fallback` must be a route nobody is denied, or guards will loop.
    pub fn new(table: impl Into<Arc<[NavigationEntry]>>, fallback: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fallback: fallback.into(),
        }
    }

    pub fn table(&self) -> &[NavigationEntry] {
        &self.table
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Pure variant: resolve against an explicit grant source.
    pub fn resolve<G: GuardCheck + ?Sized>(&self, grants: &G) -> String {
        first_accessible_route(&self.table, grants)
            .unwrap_or(self.fallback.as_str())
            .to_string()
    }

    /// Resolve for the store's session, loading privileges first if needed.
    ///
    /// A failed load resolves against no privileges, i.e. usually the fallback.
    pub async fn find_first_accessible_page(&self, store: &PrivilegeStore) -> String {
        if !store.is_loaded() {
            if let Err(err) = store.ensure_privileges_loaded().await {
                tracing::warn!(error = %err, "privileges unavailable; resolving without them");
                return self.resolve(&PrivilegeSet::default());
            }
        }
        let route = self.resolve(store);
        tracing::debug!(%route, "resolved first accessible page");
        route
    }
}

#[cfg(test)]
mod tests {
    use examdesk_auth::testing::{ScriptedPrivilegeSource, plain_profile, session_for, store_with};
    use examdesk_auth::{AccessGuard, Privilege, Role};
    use proptest::prelude::*;

    use super::*;

    fn privileges(names: &[&'static str]) -> PrivilegeSet {
        PrivilegeSet::new(names.iter().map(|n| Privilege::from_static(*n)), [])
    }

    fn roles(names: &[&'static str]) -> PrivilegeSet {
        PrivilegeSet::new([], names.iter().map(|n| Role::from_static(*n)))
    }

    #[test]
    fn no_privileges_resolves_to_fallback() {
        let resolver = AccessiblePageResolver::default();
        assert_eq!(resolver.resolve(&PrivilegeSet::default()), "/financial-dashboard");
    }

    #[test]
    fn first_match_in_declaration_order_wins() {
        let resolver = AccessiblePageResolver::default();
        assert_eq!(resolver.resolve(&privileges(&["zones.view", "subjects.view"])), "/subjects");
        assert_eq!(resolver.resolve(&privileges(&["zones.view"])), "/zones");
    }

    #[test]
    fn open_group_descends_into_children() {
        let resolver = AccessiblePageResolver::default();
        assert_eq!(resolver.resolve(&privileges(&["departments.view"])), "/departments");
    }

    #[test]
    fn guarded_group_is_not_descended_without_access() {
        let resolver = AccessiblePageResolver::default();
        // Child privilege alone is not enough when the group guard fails.
        assert_eq!(resolver.resolve(&privileges(&["exams.view"])), "/financial-dashboard");
        // Group satisfied by role, child by privilege.
        let mut set = privileges(&["exams.view"]);
        set.roles.insert(Role::new("exam-manager"));
        assert_eq!(resolver.resolve(&set), "/exams");
    }

    #[test]
    fn satisfied_group_without_accessible_child_continues_scan() {
        let table = vec![
            NavigationEntry::group(
                "G",
                "i",
                vec![NavigationEntry::link("A", "i", "/a").guarded(AccessGuard::privilege("a"))],
            ),
            NavigationEntry::link("B", "i", "/b").guarded(AccessGuard::privilege("b")),
        ];
        assert_eq!(first_accessible_route(&table, &privileges(&["b"])), Some("/b"));
    }

    #[test]
    fn role_guard_resolves() {
        let resolver = AccessiblePageResolver::default();
        assert_eq!(resolver.resolve(&roles(&["payroll-officer"])), "/payroll");
        assert_eq!(resolver.resolve(&roles(&["approver"])), "/approval-chains");
    }

    #[tokio::test]
    async fn loads_privileges_before_resolving() {
        let source = ScriptedPrivilegeSource::granting(privileges(&["question-banks.view"]));
        let store = store_with(Some(session_for(plain_profile(1))), source.clone());
        let resolver = AccessiblePageResolver::default();

        assert_eq!(resolver.find_first_accessible_page(&store).await, "/question-banks");
        assert_eq!(resolver.find_first_accessible_page(&store).await, "/question-banks");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failed_load_resolves_to_fallback() {
        let store = store_with(
            Some(session_for(plain_profile(1))),
            ScriptedPrivilegeSource::failing("timeout"),
        );
        let resolver = AccessiblePageResolver::default();
        assert_eq!(resolver.find_first_accessible_page(&store).await, "/financial-dashboard");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: over a flat table of privilege-guarded links, the result is
        /// the earliest link whose privilege is granted.
        #[test]
        fn earliest_granted_link_wins(
            granted in prop::collection::vec(any::<bool>(), 1..12)
        ) {
            let names: Vec<String> = (0..granted.len()).map(|i| format!("p{i}")).collect();
            let table: Vec<NavigationEntry> = names
                .iter()
                .map(|n| {
                    NavigationEntry::link(n.clone(), "i", format!("/{n}")).guarded(AccessGuard::Privilege {
                        name: Privilege::new(n.clone()),
                    })
                })
                .collect();
            let set = PrivilegeSet::new(
                names.iter().zip(&granted).filter(|(_, g)| **g).map(|(n, _)| Privilege::new(n.clone())),
                [],
            );

            let expected = granted.iter().position(|g| *g).map(|i| format!("/p{i}"));
            prop_assert_eq!(first_accessible_route(&table, &set).map(str::to_string), expected);
        }

        /// Property: granting exactly one top-level privilege of the static table
        /// resolves to that entry's route.
        #[test]
        fn single_top_level_privilege_resolves_to_its_entry(index in 0usize..16) {
            let table = static_navigation();
            let candidates: Vec<(&str, &str)> = table
                .iter()
                .filter_map(|e| match (&e.guard, e.route()) {
                    (AccessGuard::Privilege { name }, Some(route)) => Some((name.as_str(), route)),
                    _ => None,
                })
                .collect();
            let (privilege, route) = candidates[index % candidates.len()];
            let set = PrivilegeSet::new([Privilege::new(privilege.to_string())], []);
            prop_assert_eq!(first_accessible_route(&table, &set), Some(route));
        }
    }
}
