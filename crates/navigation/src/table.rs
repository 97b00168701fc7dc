//! The application's static sidebar, in declaration order.
//!
//! Order matters: the resolver picks the first entry the identity may open.

use examdesk_auth::AccessGuard;
use examdesk_core::reserved;

use crate::{NavigationEntry, Position};

pub fn static_navigation() -> Vec<NavigationEntry> {
    vec![
        NavigationEntry::link("Subjects", "i-heroicons-book-open", "/subjects")
            .guarded(AccessGuard::privilege("subjects.view")),
        NavigationEntry::link("Question banks", "i-heroicons-circle-stack", "/question-banks")
            .guarded(AccessGuard::privilege("question-banks.view")),
        NavigationEntry::group(
            "Examinations",
            "i-heroicons-academic-cap",
            vec![
                NavigationEntry::link("Exams", "i-heroicons-document-text", "/exams")
                    .guarded(AccessGuard::privilege("exams.view")),
                NavigationEntry::link(
                    "Examination centers",
                    "i-heroicons-building-office",
                    "/examination-centers",
                )
                .guarded(AccessGuard::privilege("examination-centers.view")),
            ],
        )
        .guarded(AccessGuard::either("exams.manage", "exam-manager")),
        NavigationEntry::group(
            "Organization",
            "i-heroicons-user-group",
            vec![
                NavigationEntry::link("Employees", "i-heroicons-users", "/employees")
                    .guarded(AccessGuard::privilege("employees.view")),
                NavigationEntry::link("Departments", "i-heroicons-building-library", "/departments")
                    .guarded(AccessGuard::privilege("departments.view")),
                NavigationEntry::link("Work schedules", "i-heroicons-calendar-days", "/work-schedules")
                    .guarded(AccessGuard::privilege("work-schedules.view")),
            ],
        ),
        NavigationEntry::link("Approval chains", "i-heroicons-arrows-right-left", "/approval-chains")
            .guarded(AccessGuard::either("approval-chains.view", "approver")),
        NavigationEntry::link("Attendance", "i-heroicons-finger-print", "/attendance")
            .guarded(AccessGuard::privilege("attendance.view")),
        NavigationEntry::link("Payroll", "i-heroicons-banknotes", "/payroll")
            .guarded(AccessGuard::role("payroll-officer")),
        NavigationEntry::link("Zones", "i-heroicons-map", "/zones")
            .guarded(AccessGuard::privilege("zones.view")),
        NavigationEntry::link("Reports", "i-heroicons-chart-bar", "/reports")
            .guarded(AccessGuard::privilege("reports.view")),
        NavigationEntry::group(
            "Administration",
            "i-heroicons-shield-check",
            vec![
                NavigationEntry::link("Users", "i-heroicons-user", "/users"),
                NavigationEntry::link("Roles", "i-heroicons-key", "/roles"),
            ],
        )
        .guarded(AccessGuard::role("admin"))
        .at(Position::End),
        NavigationEntry::link(
            "Financial dashboard",
            "i-heroicons-presentation-chart-line",
            reserved::FINANCIAL_DASHBOARD,
        )
        .at(Position::End),
    ]
}
