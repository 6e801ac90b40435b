//! Staging directory management.

use std::path::{Path, PathBuf};

use crate::locks::{PathGuard, PathLocks};
use crate::{StoreError, names};

/// Staging area for deck archives.
///
/// Uploaded archives land at `<dir>/<original filename>`, exported
/// archives at `<dir>/<deck>.apkg`. Overwriting a same-named file is
/// allowed and silent.
#[derive(Debug)]
pub struct FileStore {
    base: PathBuf,
    locks: PathLocks,
}

impl FileStore {
    /// Opens the store at `base`, creating the directory tree if absent.
    pub fn new(base: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base = base.into();
        std::fs::create_dir_all(&base)?;
        let base = std::fs::canonicalize(&base)?;
        tracing::debug!(dir = %base.display(), "file store ready");
        Ok(Self {
            base,
            locks: PathLocks::new(),
        })
    }

    /// The staging directory.
    pub fn dir(&self) -> &Path {
        &self.base
    }

    /// Resolves the staging path for an uploaded archive.
    pub fn archive_path(&self, file_name: &str) -> Result<PathBuf, StoreError> {
        names::validate_archive_name(file_name)?;
        Ok(self.base.join(file_name))
    }

    /// Resolves the export path for a deck: `<dir>/<deck>.apkg`.
    pub fn export_path(&self, deck: &str) -> Result<PathBuf, StoreError> {
        names::validate_deck_name(deck)?;
        Ok(self.base.join(format!("{deck}{}", names::ARCHIVE_SUFFIX)))
    }

    /// Acquires the per-path lock guarding `path`.
    pub async fn lock(&self, path: &Path) -> PathGuard {
        self.locks.acquire(path).await
    }

    /// Writes uploaded bytes to `path`.
    pub async fn stage(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        tokio::fs::write(path, bytes).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "staged archive");
        Ok(())
    }

    /// Best-effort delete with an explicit, logged outcome.
    ///
    /// Absence of the file at delete time is not an error.
    pub fn remove(&self, path: &Path) -> CleanupOutcome {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "removed archive");
                CleanupOutcome::Removed
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "archive already gone");
                CleanupOutcome::Missing
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove archive");
                CleanupOutcome::Failed
            }
        }
    }
}

/// Result of a best-effort cleanup delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    Missing,
    Failed,
}
