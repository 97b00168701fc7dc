use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Privilege, Role};

/// Everything the backend granted to the current identity.
///
/// This is the payload of the privileges endpoint and the unit the
/// [`PrivilegeStore`](crate::PrivilegeStore) replaces atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeSet {
    #[serde(default)]
    pub privileges: BTreeSet<Privilege>,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl PrivilegeSet {
    pub fn new(
        privileges: impl IntoIterator<Item = Privilege>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            privileges: privileges.into_iter().collect(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.privileges.is_empty() && self.roles.is_empty()
    }

    pub fn has_privilege(&self, name: &str) -> bool {
        self.privileges.iter().any(|p| p.as_str() == name)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == name)
    }
}

/// Access requirement attached to a navigation entry or a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessGuard {
    /// Anyone who reached the page may see it.
    #[default]
    Open,
    Privilege { name: Privilege },
    Role { name: Role },
    /// Satisfied by the privilege OR the role.
    Either { privilege: Privilege, role: Role },
}

impl AccessGuard {
    pub const fn privilege(name: &'static str) -> Self {
        Self::Privilege {
            name: Privilege::from_static(name),
        }
    }

    pub const fn role(name: &'static str) -> Self {
        Self::Role {
            name: Role::from_static(name),
        }
    }

    pub const fn either(privilege: &'static str, role: &'static str) -> Self {
        Self::Either {
            privilege: Privilege::from_static(privilege),
            role: Role::from_static(role),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Something that can answer privilege/role predicates.
///
/// Implemented by [`PrivilegeSet`] for pure evaluation and by
/// [`PrivilegeStore`](crate::PrivilegeStore) for the live session.
pub trait GuardCheck {
    fn has_privilege(&self, name: &str) -> bool;

    fn has_role(&self, name: &str) -> bool;

    /// Evaluate a guard. `Either` needs only one of its two halves.
    fn satisfies(&self, guard: &AccessGuard) -> bool {
        match guard {
            AccessGuard::Open => true,
            AccessGuard::Privilege { name } => self.has_privilege(name.as_str()),
            AccessGuard::Role { name } => self.has_role(name.as_str()),
            AccessGuard::Either { privilege, role } => {
                self.has_privilege(privilege.as_str()) || self.has_role(role.as_str())
            }
        }
    }
}

impl GuardCheck for PrivilegeSet {
    fn has_privilege(&self, name: &str) -> bool {
        PrivilegeSet::has_privilege(self, name)
    }

    fn has_role(&self, name: &str) -> bool {
        PrivilegeSet::has_role(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grants(privileges: &[&'static str], roles: &[&'static str]) -> PrivilegeSet {
        PrivilegeSet::new(
            privileges.iter().map(|p| Privilege::from_static(*p)),
            roles.iter().map(|r| Role::from_static(*r)),
        )
    }

    #[test]
    fn open_guard_is_always_satisfied() {
        assert!(PrivilegeSet::default().satisfies(&AccessGuard::Open));
    }

    #[test]
    fn privilege_and_role_are_checked_independently() {
        let set = grants(&["exams.view"], &["admin"]);
        assert!(set.satisfies(&AccessGuard::privilege("exams.view")));
        assert!(!set.satisfies(&AccessGuard::privilege("admin")));
        assert!(set.satisfies(&AccessGuard::role("admin")));
        assert!(!set.satisfies(&AccessGuard::role("exams.view")));
    }

    #[test]
    fn either_guard_needs_only_one_half() {
        let guard = AccessGuard::either("payroll.view", "payroll-officer");
        assert!(grants(&["payroll.view"], &[]).satisfies(&guard));
        assert!(grants(&[], &["payroll-officer"]).satisfies(&guard));
        assert!(!grants(&["payroll.edit"], &["admin"]).satisfies(&guard));
    }

    #[test]
    fn privilege_set_decodes_backend_payload() {
        let set: PrivilegeSet =
            serde_json::from_str(r#"{"privileges":["subjects.view"],"roles":["teacher"]}"#).unwrap();
        assert!(set.has_privilege("subjects.view"));
        assert!(set.has_role("teacher"));

        let empty: PrivilegeSet = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn guard_serializes_with_kind_tag() {
        let json = serde_json::to_value(AccessGuard::role("admin")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "role", "name": "admin"}));
    }
}
