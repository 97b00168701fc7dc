//! `examdesk-core` — identifiers, route paths and the shared error model.
//!
//! This crate has no knowledge of sessions, privileges or HTTP.

pub mod error;
pub mod id;
pub mod route;

pub use error::{DomainError, DomainResult};
pub use id::{ExamCenterId, HallId, NavigationId, UserId};
pub use route::{CurrentRoute, bare_path, is_within_prefix, reserved};
