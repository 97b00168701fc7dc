//! Session storage persisted as a JSON file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;

use examdesk_auth::{AuthError, IdentitySession, SessionStorage};

/// Keeps the session in a single JSON file.
///
/// A missing file means "no session". Writes go through a sibling temp file
/// and a rename, so a crash never leaves a half-written session behind.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> anyhow::Result<Option<IdentitySession>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", self.path.display())),
        };
        let session = serde_json::from_slice(&bytes)
            .with_context(|| format!("decoding {}", self.path.display()))?;
        Ok(Some(session))
    }

    fn write(&self, session: &IdentitySession) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(session).context("encoding session")?;
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("moving {} into place", tmp.display()))?;
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<IdentitySession>, AuthError> {
        self.read().map_err(|e| AuthError::storage(format!("{e:#}")))
    }

    fn save(&self, session: &IdentitySession) -> Result<(), AuthError> {
        self.write(session)
            .map_err(|e| AuthError::storage(format!("{e:#}")))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::storage(format!("removing {}: {e}", self.path.display()))),
        }
    }
}
