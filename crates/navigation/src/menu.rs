//! Sidebar state: which entries to show and whether the drawer is open.
//!
//! Presentation only. Nothing here grants or denies navigation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use examdesk_auth::GuardCheck;
use examdesk_core::CurrentRoute;

use crate::{NavigationEntry, exam_center_context, exam_center_navigation, static_navigation};

/// Viewport width (px) below which the sidebar becomes a drawer.
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuHeader {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub mobile_breakpoint: u32,
    pub header: MenuHeader,
    pub footer: Vec<NavigationEntry>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            header: MenuHeader {
                title: "Examdesk".to_string(),
                subtitle: None,
            },
            footer: vec![NavigationEntry::link("Settings", "i-heroicons-cog-6-tooth", "/settings")],
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigationMenu {
    table: Arc<[NavigationEntry]>,
    config: MenuConfig,
    viewport_width: u32,
    collapsed: bool,
    mobile_open: bool,
}

impl NavigationMenu {
    pub fn new(table: impl Into<Arc<[NavigationEntry]>>, config: MenuConfig, viewport_width: u32) -> Self {
        Self {
            table: table.into(),
            config,
            viewport_width,
            collapsed: false,
            mobile_open: false,
        }
    }

    pub fn with_static_table(config: MenuConfig, viewport_width: u32) -> Self {
        Self::new(static_navigation(), config, viewport_width)
    }

    /// Entries to render for `route`.
    ///
    /// Inside an exam center the center's menu replaces the static table
    /// outright. Otherwise the static table is filtered by `grants`; a child is
    /// shown on its own guard, and a group with no route and nothing visible
    /// under it is dropped. Every entry comes back with a concrete position.
    pub fn menu_items<G: GuardCheck + ?Sized>(&self, route: &CurrentRoute, grants: &G) -> Vec<NavigationEntry> {
        if let Some(exam_center_id) = exam_center_context(route) {
            return exam_center_navigation(exam_center_id)
                .into_iter()
                .map(with_position)
                .collect();
        }
        visible_entries(&self.table, grants)
    }

    pub fn header(&self) -> &MenuHeader {
        &self.config.header
    }

    pub fn footer(&self) -> &[NavigationEntry] {
        &self.config.footer
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width < self.config.mobile_breakpoint
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_mobile_open(&self) -> bool {
        self.mobile_open
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn open_mobile(&mut self) {
        self.mobile_open = true;
    }

    pub fn close_mobile(&mut self) {
        self.mobile_open = false;
    }

    /// Growing past the breakpoint closes the drawer.
    pub fn on_viewport_resize(&mut self, width: u32) {
        let was_mobile = self.is_mobile();
        self.viewport_width = width;
        if was_mobile && !self.is_mobile() {
            self.mobile_open = false;
        }
    }

    /// Any route change closes the drawer on mobile widths.
    pub fn on_route_change(&mut self, _route: &CurrentRoute) {
        if self.is_mobile() {
            self.mobile_open = false;
        }
    }
}

fn with_position(mut entry: NavigationEntry) -> NavigationEntry {
    entry.position = Some(entry.effective_position());
    entry
}

fn visible_entries<G: GuardCheck + ?Sized>(entries: &[NavigationEntry], grants: &G) -> Vec<NavigationEntry> {
    entries
        .iter()
        .filter(|entry| grants.satisfies(&entry.guard))
        .filter_map(|entry| {
            let children = visible_entries(&entry.children, grants);
            if entry.route.is_none() && children.is_empty() {
                return None;
            }
            let mut visible = with_position(entry.clone());
            visible.children = children;
            Some(visible)
        })
        .collect()
}
