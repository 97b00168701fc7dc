//! `examdesk-guards` — the navigation guard pipeline.
//!
//! Every navigation runs through [`GuardPipeline`]: the
//! [`AuthenticationGuard`] first, then the [`AssignmentGuard`]. Each guard
//! either lets the navigation through or redirects it.

pub mod assignment;
pub mod authentication;
pub mod config;
pub mod decision;
pub mod error;
pub mod pipeline;
pub mod policy;

pub use assignment::AssignmentGuard;
pub use authentication::AuthenticationGuard;
pub use config::GuardConfig;
pub use decision::{Decision, Navigation};
pub use error::GuardError;
pub use pipeline::{Guard, GuardPipeline};
pub use policy::{NavigationRoutePolicy, RouteAccessPolicy};
