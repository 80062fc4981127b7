//! Entry reconciler: one action per entry name.
//!
//! Names in the source are created when missing from the replica and
//! content-compared when both sides are regular files. Names only in the
//! replica are deleted. Anything else (a directory in both trees, a kind
//! mismatch, an unclassified entry) is a no-op: directories present on both
//! sides are never compared below the top level.

use replica_core::{EntryKind, EntryName, Operation, ReconciliationAction, TreeRoot};

use crate::compare::files_equal;
use crate::error::{CompareError, SyncError};
use crate::listing::Listing;

/// A planned action, or the comparison failure that prevented planning one.
pub type Planned = Result<ReconciliationAction, CompareError>;

/// Plan the actions that make `replica` match `source`.
///
/// `same_contents` is only called for names that are regular files in both
/// listings. Output order follows name order within each group, but callers
/// must not rely on it.
pub fn reconcile<F>(source: &Listing, replica: &Listing, mut same_contents: F) -> Vec<Planned>
where
    F: FnMut(&EntryName) -> Result<bool, SyncError>,
{
    let mut planned = Vec::with_capacity(source.len() + replica.len());

    for (name, kind) in source.iter() {
        let action = |operation: Operation| -> Planned {
            Ok(ReconciliationAction::new(name.clone(), operation, kind))
        };

        if !replica.contains(name) {
            let operation = match kind {
                Some(EntryKind::RegularFile) => Operation::CreateFile,
                Some(EntryKind::Directory) => Operation::CreateDir,
                None => Operation::NoOp,
            };
            planned.push(action(operation));
            continue;
        }

        let both_files = kind == Some(EntryKind::RegularFile)
            && replica.kind_of(name) == Some(EntryKind::RegularFile);
        if !both_files {
            planned.push(action(Operation::NoOp));
            continue;
        }

        planned.push(match same_contents(name) {
            Ok(true) => action(Operation::NoOp),
            Ok(false) => action(Operation::UpdateFile),
            Err(err) => Err(CompareError {
                name: name.clone(),
                source: err,
            }),
        });
    }

    for (name, kind) in replica.iter().filter(|(name, _)| !source.contains(name)) {
        let operation = match kind {
            Some(EntryKind::RegularFile) => Operation::DeleteFile,
            Some(EntryKind::Directory) => Operation::DeleteDir,
            None => Operation::NoOp,
        };
        planned.push(Ok(ReconciliationAction::new(name.clone(), operation, kind)));
    }

    planned
}

/// [`reconcile`] with the on-disk content comparator for the two roots.
pub fn reconcile_roots(
    source_root: &TreeRoot,
    replica_root: &TreeRoot,
    source: &Listing,
    replica: &Listing,
) -> Vec<Planned> {
    reconcile(source, replica, |name| {
        files_equal(
            &source_root.entry_path(name),
            &replica_root.entry_path(name),
        )
    })
}
