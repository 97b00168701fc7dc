//! Route-level access requirements, keyed by path.

use examdesk_auth::AccessGuard;
use examdesk_core::is_within_prefix;
use examdesk_navigation::NavigationEntry;

/// Maps a path to the guard that protects it.
pub trait RouteAccessPolicy: Send + Sync {
    /// Guard for `path`; [`AccessGuard::Open`] when nothing protects it.
    fn required_guard(&self, path: &str) -> AccessGuard;
}

/// Route policy derived from a navigation table.
///
/// Each routed entry, top-level or child, protects its route and everything
/// below it with its own guard. An open child inherits its group's guard.
/// The longest matching route wins, so `/exams/12` falls under `/exams` but a
/// more specific entry would override.
#[derive(Debug, Clone, Default)]
pub struct NavigationRoutePolicy {
    rules: Vec<(String, AccessGuard)>,
}

impl NavigationRoutePolicy {
    pub fn from_table(table: &[NavigationEntry]) -> Self {
        let mut rules = Vec::new();
        for entry in table {
            collect(entry, &AccessGuard::Open, &mut rules);
        }
        // Longest first so the first hit is the most specific one.
        rules.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { rules }
    }

    pub fn rules(&self) -> &[(String, AccessGuard)] {
        &self.rules
    }
}

fn collect(entry: &NavigationEntry, inherited: &AccessGuard, rules: &mut Vec<(String, AccessGuard)>) {
    let guard = if entry.guard.is_open() {
        inherited
    } else {
        &entry.guard
    };
    if let Some(route) = entry.route() {
        rules.push((route.to_string(), guard.clone()));
    }
    for child in &entry.children {
        collect(child, guard, rules);
    }
}

impl RouteAccessPolicy for NavigationRoutePolicy {
    fn required_guard(&self, path: &str) -> AccessGuard {
        self.rules
            .iter()
            .find(|(route, _)| is_within_prefix(path, route))
            .map(|(_, guard)| guard.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use examdesk_navigation::static_navigation;

    use super::*;

    #[test]
    fn child_routes_carry_their_own_guard() {
        let policy = NavigationRoutePolicy::from_table(&static_navigation());
        assert_eq!(policy.required_guard("/exams"), AccessGuard::privilege("exams.view"));
        assert_eq!(policy.required_guard("/departments"), AccessGuard::privilege("departments.view"));
    }

    #[test]
    fn open_children_inherit_the_group_guard() {
        let policy = NavigationRoutePolicy::from_table(&static_navigation());
        assert_eq!(policy.required_guard("/users"), AccessGuard::role("admin"));
        assert_eq!(policy.required_guard("/roles/3"), AccessGuard::role("admin"));
    }

    #[test]
    fn nested_paths_inherit_the_route_guard() {
        let policy = NavigationRoutePolicy::from_table(&static_navigation());
        assert_eq!(policy.required_guard("/subjects/12/edit"), AccessGuard::privilege("subjects.view"));
        assert_eq!(
            policy.required_guard("/examination-centers/3/exams"),
            AccessGuard::privilege("examination-centers.view")
        );
    }

    #[test]
    fn unknown_and_reserved_paths_are_open() {
        let policy = NavigationRoutePolicy::from_table(&static_navigation());
        assert_eq!(policy.required_guard("/"), AccessGuard::Open);
        assert_eq!(policy.required_guard("/settings"), AccessGuard::Open);
        assert_eq!(policy.required_guard("/financial-dashboard"), AccessGuard::Open);
        // Segment-aware: `/examsxyz` is not under `/exams`.
        assert_eq!(policy.required_guard("/examsxyz"), AccessGuard::Open);
    }

    #[test]
    fn longest_route_wins() {
        let table = vec![
            NavigationEntry::link("Reports", "i", "/reports").guarded(AccessGuard::privilege("reports.view")),
            NavigationEntry::link("Payroll reports", "i", "/reports/payroll")
                .guarded(AccessGuard::role("payroll-officer")),
        ];
        let policy = NavigationRoutePolicy::from_table(&table);
        assert_eq!(policy.required_guard("/reports/payroll/2024"), AccessGuard::role("payroll-officer"));
        assert_eq!(policy.required_guard("/reports/attendance"), AccessGuard::privilege("reports.view"));
    }
}
