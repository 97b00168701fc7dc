//! Route paths as seen by the navigation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Routes that never require a privilege. Guarding any of them would let the
/// guards redirect in a cycle.
pub mod reserved {
    pub const LOGIN: &str = "/login";
    pub const ACCESS_DENIED: &str = "/access-denied";
    pub const FINANCIAL_DASHBOARD: &str = "/financial-dashboard";
    pub const ROOT: &str = "/";
}

/// The route a navigation points at: its path plus the parameters the router
/// extracted from it (e.g. `id` for `/examination-centers/:id/...`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRoute {
    pub path: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl CurrentRoute {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Path without query string or fragment.
    pub fn bare_path(&self) -> &str {
        bare_path(&self.path)
    }
}

/// Strips `?query` and `#fragment` from a path.
pub fn bare_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Segment-aware prefix test: `/a/4` contains `/a/4` and `/a/4/b`, but not `/a/42`.
pub fn is_within_prefix(path: &str, prefix: &str) -> bool {
    let path = bare_path(path);
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
