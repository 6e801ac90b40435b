//! Per-path mutual exclusion.
//!
//! Staging paths are derived from caller-supplied names, so two concurrent
//! requests can resolve to the same file. Each resolved path gets its own
//! async mutex; a request holds the guard for its full
//! write/call/delete (or export/stream/delete) sequence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Guard for one path. Dropping releases the lock.
pub type PathGuard = OwnedMutexGuard<()>;

/// Registry of per-path locks.
#[derive(Debug, Default)]
pub struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `path`, waiting if another request holds it.
    pub async fn acquire(&self, path: &Path) -> PathGuard {
        let entry = {
            let mut map = self.inner.lock().await;
            // An entry whose Arc is only held by the map is idle.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(path.to_path_buf()).or_default())
        };
        entry.lock_owned().await
    }

    #[cfg(test)]
    pub(crate) async fn tracked_paths(&self) -> usize {
        self.inner.lock().await.len()
    }
}
