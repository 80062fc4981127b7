//! Validated run configuration.
//!
//! Both roots are made absolute and checked once, at startup. A failure here
//! is the only condition under which the sync loop does not start.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ValidationError;
use crate::types::{Role, TreeRoot};

/// Default polling interval between passes (five minutes).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Default event log location, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "sync_log.txt";

/// Everything a sync pass and the loop around it need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source: TreeRoot,
    pub replica: TreeRoot,
    pub interval: Duration,
    /// Plan and report actions without touching the replica.
    pub dry_run: bool,
}

impl SyncConfig {
    /// Validate `source` then `replica` and build a config.
    ///
    /// The source is checked first, so when both roots are bad the error
    /// names the source.
    pub fn new(
        source: impl AsRef<Path>,
        replica: impl AsRef<Path>,
        interval: Duration,
    ) -> Result<Self, ValidationError> {
        let source = validate_root(Role::Source, source.as_ref())?;
        let replica = validate_root(Role::Replica, replica.as_ref())?;
        if interval.is_zero() {
            return Err(ValidationError::ZeroInterval);
        }
        Ok(Self {
            source,
            replica,
            interval,
            dry_run: false,
        })
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Resolve `path` to an absolute path and require it to be a directory.
pub fn validate_root(role: Role, path: &Path) -> Result<TreeRoot, ValidationError> {
    let absolute: PathBuf =
        std::path::absolute(path).map_err(|source| ValidationError::Unresolvable {
            role,
            path: path.to_path_buf(),
            source,
        })?;

    match std::fs::metadata(&absolute) {
        Ok(meta) if meta.is_dir() => Ok(TreeRoot::new(role, absolute)),
        Ok(_) => Err(ValidationError::NotADirectory {
            role,
            path: absolute,
        }),
        Err(_) => Err(ValidationError::Missing {
            role,
            path: absolute,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn relative_root_is_made_absolute() {
        let root = validate_root(Role::Source, Path::new(".")).unwrap();
        assert!(root.path().is_absolute());
        assert_eq!(root.role(), Role::Source);
    }

    #[test]
    fn zero_interval_rejected() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        let err = SyncConfig::new(source.path(), replica.path(), Duration::ZERO).unwrap_err();
        assert!(matches!(err, ValidationError::ZeroInterval));
    }

    #[test]
    fn dry_run_defaults_off() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        let config = SyncConfig::new(source.path(), replica.path(), DEFAULT_INTERVAL).unwrap();
        assert!(!config.dry_run);
        assert!(config.with_dry_run(true).dry_run);
    }
}
