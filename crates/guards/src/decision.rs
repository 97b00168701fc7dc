use serde::{Deserialize, Serialize};

use examdesk_core::{CurrentRoute, NavigationId};

/// Outcome of evaluating one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum Decision {
    Proceed,
    Redirect(String),
}

impl Decision {
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect(to.into())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(to) => Some(to),
            Self::Proceed => None,
        }
    }
}

/// A pending route transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub id: NavigationId,
    pub from: CurrentRoute,
    pub to: CurrentRoute,
}

impl Navigation {
    pub fn new(from: CurrentRoute, to: CurrentRoute) -> Self {
        Self {
            id: NavigationId::new(),
            from,
            to,
        }
    }

    /// Navigation between two bare paths, without route parameters.
    pub fn between(from: &str, to: &str) -> Self {
        Self::new(CurrentRoute::new(from), CurrentRoute::new(to))
    }

    pub fn from_path(&self) -> &str {
        self.from.bare_path()
    }

    pub fn to_path(&self) -> &str {
        self.to.bare_path()
    }

    /// Whether this is the post-login hop from the login page to the root.
    pub fn is_post_login_landing(&self, login_route: &str) -> bool {
        self.from_path() == login_route && self.to_path() == examdesk_core::reserved::ROOT
    }
}
