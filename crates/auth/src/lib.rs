//! `examdesk-auth` — identity session, privileges and the privilege store.
//!
//! This crate knows nothing about routes or HTTP; backends plug in through
//! [`PrivilegeSource`] and [`SessionStorage`].

pub mod authorize;
pub mod error;
pub mod privileges;
pub mod profile;
pub mod roles;
pub mod session;
pub mod source;
pub mod storage;
pub mod store;
pub mod testing;

pub use authorize::{AccessGuard, GuardCheck, PrivilegeSet};
pub use error::AuthError;
pub use privileges::Privilege;
pub use profile::{ExamCenterAssignment, FixedAssignment, HallAssignment, UserProfile};
pub use roles::Role;
pub use session::{AuthToken, IdentitySession};
pub use source::{PrivilegeSource, StaticPrivilegeSource};
pub use storage::{InMemorySessionStorage, SessionStorage};
pub use store::{PrivilegeState, PrivilegeStore};
