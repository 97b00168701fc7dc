//! Menu shown while the user is inside one examination center.
//!
//! These entries are not privilege-checked: getting into the center's pages
//! at all is what the route guards decide.

use examdesk_core::{CurrentRoute, ExamCenterId};

use crate::{NavigationEntry, Position};

pub const EXAM_CENTERS_ROUTE: &str = "/examination-centers";

/// Route parameter holding the exam-center id.
pub const EXAM_CENTER_PARAM: &str = "id";

pub fn exam_center_navigation(exam_center_id: ExamCenterId) -> Vec<NavigationEntry> {
    let base = format!("{EXAM_CENTERS_ROUTE}/{exam_center_id}");
    vec![
        NavigationEntry::link("Exams", "i-heroicons-document-text", format!("{base}/exams")),
        NavigationEntry::link("Halls", "i-heroicons-building-storefront", format!("{base}/halls")),
        NavigationEntry::link("Proctors", "i-heroicons-identification", format!("{base}/proctors")),
        NavigationEntry::link("Attendance", "i-heroicons-finger-print", format!("{base}/attendance")),
        NavigationEntry::link("Reports", "i-heroicons-chart-bar", format!("{base}/reports")),
        NavigationEntry::link("All centers", "i-heroicons-arrow-uturn-left", EXAM_CENTERS_ROUTE)
            .at(Position::End),
    ]
}

/// The exam center whose menu applies to `route`, if any.
///
/// Requires a path under `/examination-centers/` and a parseable `id`
/// parameter; anything else keeps the static menu.
pub fn exam_center_context(route: &CurrentRoute) -> Option<ExamCenterId> {
    let detail_prefix = format!("{EXAM_CENTERS_ROUTE}/");
    if !route.bare_path().starts_with(&detail_prefix) {
        return None;
    }
    let raw = route.param(EXAM_CENTER_PARAM)?;
    match raw.parse::<ExamCenterId>() {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::debug!(param = raw, error = %err, "ignoring malformed exam-center id");
            None
        }
    }
}

/// Route for a bare path, with the exam-center `id` parameter filled in the
/// way the router would for `/examination-centers/:id/...`.
pub fn route_from_path(path: &str) -> CurrentRoute {
    let route = CurrentRoute::new(path);
    let id = route
        .bare_path()
        .strip_prefix(EXAM_CENTERS_ROUTE)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|rest| rest.split('/').next())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string);
    match id {
        Some(id) => route.with_param(EXAM_CENTER_PARAM, id),
        None => route,
    }
}
