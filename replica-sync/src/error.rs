//! Error types for replica-sync.

use std::path::PathBuf;

use thiserror::Error;

use replica_core::EntryName;

/// All errors that can arise while listing, comparing or applying.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Content comparison failed for a name that is a regular file in both trees.
///
/// Surfaces as a failed update for that one name; the pass carries on.
#[derive(Debug, Error)]
#[error("cannot compare {name}: {source}")]
pub struct CompareError {
    pub name: EntryName,
    #[source]
    pub source: SyncError,
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
