//! `examdesk-navigation` — navigation tables, the exam-center menu, the
//! landing-page resolver and sidebar state.

pub mod entry;
pub mod exam_center;
pub mod menu;
pub mod resolver;
pub mod table;

pub use entry::{NavigationEntry, Position};
pub use exam_center::{
    EXAM_CENTER_PARAM, EXAM_CENTERS_ROUTE, exam_center_context, exam_center_navigation,
    route_from_path,
};
pub use menu::{DEFAULT_MOBILE_BREAKPOINT, MenuConfig, MenuHeader, NavigationMenu};
pub use resolver::{AccessiblePageResolver, first_accessible_route};
pub use table::static_navigation;
