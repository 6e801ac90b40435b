//! Local staging area for uploaded and exported deck archives.
//!
//! A single directory holds every archive; filenames are the only
//! identity. Paths are resolved strictly from validated caller-supplied
//! names, and requests that touch the same file serialize through a
//! per-path lock.

mod locks;
mod names;
mod store;

pub use locks::{PathGuard, PathLocks};
pub use names::{ARCHIVE_SUFFIX, validate_archive_name, validate_deck_name};
pub use store::{CleanupOutcome, FileStore};

/// Errors produced by the file store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid name: {0}")]
    InvalidName(String),
}
