//! Error types for replica-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Role;

/// A configured root failed startup validation.
///
/// Fatal: the sync loop never starts when one of these is returned.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Nothing exists at the configured path.
    #[error("{role} folder {path} does not exist.")]
    Missing { role: Role, path: PathBuf },

    /// The path exists but is a file (or something else), not a directory.
    #[error("{role} folder {path} is not a directory.")]
    NotADirectory { role: Role, path: PathBuf },

    /// The path could not be made absolute (e.g. the working directory is gone).
    #[error("cannot resolve {role} folder {path}: {source}")]
    Unresolvable {
        role: Role,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The polling interval must be at least one second.
    #[error("sync interval must be at least 1 second")]
    ZeroInterval,
}
