use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use examdesk_auth::AccessGuard;

/// Where an entry is rendered in the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Start,
    End,
}

/// One line of the navigation menu.
///
/// An entry either links somewhere (`route`), groups children, or both.
/// In menus and landing-page resolution children carry their own guard;
/// nothing is inherited from the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub name: Cow<'static, str>,
    pub icon: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "AccessGuard::is_open")]
    pub guard: AccessGuard,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl NavigationEntry {
    pub fn link(
        name: impl Into<Cow<'static, str>>,
        icon: impl Into<Cow<'static, str>>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            route: Some(route.into()),
            guard: AccessGuard::Open,
            children: Vec::new(),
            position: None,
        }
    }

    pub fn group(
        name: impl Into<Cow<'static, str>>,
        icon: impl Into<Cow<'static, str>>,
        children: Vec<NavigationEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            route: None,
            guard: AccessGuard::Open,
            children,
            position: None,
        }
    }

    pub fn guarded(mut self, guard: AccessGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn effective_position(&self) -> Position {
        self.position.unwrap_or_default()
    }
}
