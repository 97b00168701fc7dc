//! Where privilege sets come from.

use async_trait::async_trait;

use crate::{AuthError, IdentitySession, PrivilegeSet};

/// Backend boundary for the privileges endpoint.
#[async_trait]
pub trait PrivilegeSource: Send + Sync {
    async fn fetch(&self, session: &IdentitySession) -> Result<PrivilegeSet, AuthError>;
}

/// Returns the same set for every session. Useful for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPrivilegeSource {
    set: PrivilegeSet,
}

impl StaticPrivilegeSource {
    pub fn new(set: PrivilegeSet) -> Self {
        Self { set }
    }
}

#[async_trait]
impl PrivilegeSource for StaticPrivilegeSource {
    async fn fetch(&self, _session: &IdentitySession) -> Result<PrivilegeSet, AuthError> {
        Ok(self.set.clone())
    }
}
