//! Top-level listing of a root, with each entry classified by kind.

use std::collections::BTreeMap;
use std::path::Path;

use replica_core::{EntryKind, EntryName, TreeRoot};

use crate::error::{io_err, SyncError};

/// Direct children of one root, keyed by name.
///
/// A kind of `None` marks an entry that is neither a regular file nor a
/// directory (socket, FIFO, dangling symlink).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    entries: BTreeMap<EntryName, Option<EntryKind>>,
}

impl Listing {
    /// List and classify the direct children of `root`.
    pub fn read(root: &TreeRoot) -> Result<Self, SyncError> {
        let dir = root.path();
        let mut entries = BTreeMap::new();
        for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
            let entry = entry.map_err(|e| io_err(dir, e))?;
            let kind = classify(&entry.path());
            entries.insert(EntryName::from(entry.file_name()), kind);
        }
        tracing::debug!("listed {} entries in {}", entries.len(), dir.display());
        Ok(Self { entries })
    }

    pub fn contains(&self, name: &EntryName) -> bool {
        self.entries.contains_key(name)
    }

    /// Kind of `name`, or `None` when absent or unclassified.
    pub fn kind_of(&self, name: &EntryName) -> Option<EntryKind> {
        self.entries.get(name).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryName, Option<EntryKind>)> {
        self.entries.iter().map(|(name, kind)| (name, *kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<EntryName>> FromIterator<(N, Option<EntryKind>)> for Listing {
    fn from_iter<I: IntoIterator<Item = (N, Option<EntryKind>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, kind)| (name.into(), kind))
                .collect(),
        }
    }
}

/// Symlinks are followed, so a link to a file counts as a file.
fn classify(path: &Path) -> Option<EntryKind> {
    let meta = std::fs::metadata(path).ok()?;
    if meta.is_file() {
        Some(EntryKind::RegularFile)
    } else if meta.is_dir() {
        Some(EntryKind::Directory)
    } else {
        None
    }
}
