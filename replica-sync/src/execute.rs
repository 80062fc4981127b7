//! Action executor: applies one planned action to the replica.
//!
//! File copies carry permissions and access/modification times over from the
//! source. Directory creation copies the whole subtree. Nothing is rolled
//! back on failure: a half-copied subtree stays until a later pass deletes or
//! ignores it.

use std::fs::{self, File};
use std::path::Path;

use filetime::FileTime;

use replica_core::{ExecutionResult, Operation, ReconciliationAction, TreeRoot};

use crate::error::{io_err, SyncError};

/// Apply `action` and report how it went. Never panics and never aborts:
/// every I/O failure becomes a [`Outcome::Failure`](replica_core::Outcome).
pub fn execute(
    action: &ReconciliationAction,
    source: &TreeRoot,
    replica: &TreeRoot,
) -> ExecutionResult {
    match apply(action, source, replica) {
        Ok(()) => ExecutionResult::success(action),
        Err(err) => {
            tracing::warn!("{} {} failed: {err}", action.operation, action.name);
            ExecutionResult::failure(action.name.clone(), action.operation, err.to_string())
        }
    }
}

fn apply(
    action: &ReconciliationAction,
    source: &TreeRoot,
    replica: &TreeRoot,
) -> Result<(), SyncError> {
    let from = source.entry_path(&action.name);
    let to = replica.entry_path(&action.name);

    match action.operation {
        Operation::CreateFile | Operation::UpdateFile => copy_file(&from, &to),
        Operation::CreateDir => copy_tree(&from, &to),
        Operation::DeleteFile => fs::remove_file(&to).map_err(|e| io_err(&to, e)),
        Operation::DeleteDir => fs::remove_dir_all(&to).map_err(|e| io_err(&to, e)),
        Operation::NoOp => {
            tracing::debug!("unchanged: {}", action.name);
            Ok(())
        }
    }
}

/// Copy bytes and permissions, overwriting `to`, then carry the times over.
///
/// An unreadable source is reported against `from`; everything after that
/// fails on the replica side and is reported against `to`.
fn copy_file(from: &Path, to: &Path) -> Result<(), SyncError> {
    File::open(from).map_err(|e| io_err(from, e))?;
    fs::copy(from, to).map_err(|e| io_err(to, e))?;
    copy_times(from, to)
}

/// Recursively copy `from` to `to`, which must not exist yet.
///
/// Entries that are neither files nor directories are skipped. The directory's
/// own permissions and times are applied after its contents, so a read-only
/// source directory still copies.
fn copy_tree(from: &Path, to: &Path) -> Result<(), SyncError> {
    fs::create_dir(to).map_err(|e| io_err(to, e))?;

    for entry in fs::read_dir(from).map_err(|e| io_err(from, e))? {
        let entry = entry.map_err(|e| io_err(from, e))?;
        let child_from = entry.path();
        let child_to = to.join(entry.file_name());
        let meta = fs::metadata(&child_from).map_err(|e| io_err(&child_from, e))?;
        if meta.is_dir() {
            copy_tree(&child_from, &child_to)?;
        } else if meta.is_file() {
            copy_file(&child_from, &child_to)?;
        } else {
            tracing::debug!("skipping special file: {}", child_from.display());
        }
    }

    let meta = fs::metadata(from).map_err(|e| io_err(from, e))?;
    copy_times(from, to)?;
    fs::set_permissions(to, meta.permissions()).map_err(|e| io_err(to, e))
}

fn copy_times(from: &Path, to: &Path) -> Result<(), SyncError> {
    let meta = fs::metadata(from).map_err(|e| io_err(from, e))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(to, atime, mtime).map_err(|e| io_err(to, e))
}
