//! Domain types for one-way directory mirroring.
//!
//! Entries are always direct children of a root and are identified by name
//! alone; nothing here ever refers to a nested path.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Roots
// ---------------------------------------------------------------------------

/// Which side of the mirror a root belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Source,
    Replica,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => f.write_str("Source"),
            Role::Replica => f.write_str("Replica"),
        }
    }
}

/// An absolute path to an existing directory, validated at startup.
///
/// Construct through [`SyncConfig::new`](crate::SyncConfig::new); the path is
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeRoot {
    role: Role,
    path: PathBuf,
}

impl TreeRoot {
    pub(crate) fn new(role: Role, path: PathBuf) -> Self {
        Self { role, path }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full path of the direct child `name`.
    pub fn entry_path(&self, name: &EntryName) -> PathBuf {
        self.path.join(name.as_os_str())
    }
}

impl fmt::Display for TreeRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.display().fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A single path segment naming a direct child of a root.
///
/// Kept as an OS string so names that are not valid UTF-8 still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryName(std::ffi::OsString);

impl EntryName {
    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.to_string_lossy().fmt(f)
    }
}

impl From<std::ffi::OsString> for EntryName {
    fn from(s: std::ffi::OsString) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for EntryName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl Serialize for EntryName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string_lossy())
    }
}

/// What a name denotes inside one particular tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    RegularFile,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::RegularFile => f.write_str("file"),
            EntryKind::Directory => f.write_str("directory"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The unit of work planned for one entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateFile,
    CreateDir,
    UpdateFile,
    DeleteFile,
    DeleteDir,
    NoOp,
}

impl Operation {
    /// `true` for every operation that touches the replica.
    pub fn mutates(self) -> bool {
        !matches!(self, Operation::NoOp)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::CreateFile => "create-file",
            Operation::CreateDir => "create-dir",
            Operation::UpdateFile => "update-file",
            Operation::DeleteFile => "delete-file",
            Operation::DeleteDir => "delete-dir",
            Operation::NoOp => "no-op",
        };
        f.write_str(s)
    }
}

/// One planned operation, produced fresh on every pass.
///
/// `kind` is the kind that drove the decision: the source entry's kind for
/// creates, updates and no-ops, the replica entry's kind for deletes. It is
/// `None` when the deciding entry is neither a regular file nor a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationAction {
    pub name: EntryName,
    pub operation: Operation,
    pub kind: Option<EntryKind>,
}

impl ReconciliationAction {
    pub fn new(name: EntryName, operation: Operation, kind: Option<EntryKind>) -> Self {
        Self {
            name,
            operation,
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// How applying a single action ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    /// Dry-run mode: the action was planned but not applied.
    Planned,
    Failure(String),
}

/// Outcome of one action, reported to the logging collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub name: EntryName,
    pub operation: Operation,
    pub outcome: Outcome,
}

impl ExecutionResult {
    pub fn success(action: &ReconciliationAction) -> Self {
        Self {
            name: action.name.clone(),
            operation: action.operation,
            outcome: Outcome::Success,
        }
    }

    pub fn planned(action: &ReconciliationAction) -> Self {
        Self {
            name: action.name.clone(),
            operation: action.operation,
            outcome: Outcome::Planned,
        }
    }

    pub fn failure(name: EntryName, operation: Operation, reason: impl Into<String>) -> Self {
        Self {
            name,
            operation,
            outcome: Outcome::Failure(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failure(_))
    }

    /// Human-readable line for the event log.
    pub fn describe(&self) -> String {
        let name = &self.name;
        match &self.outcome {
            Outcome::Success => match self.operation {
                Operation::CreateFile => format!("Copied {name} to replica folder."),
                Operation::CreateDir => format!("Copied directory {name} to replica folder."),
                Operation::UpdateFile => format!("Updated {name} in replica folder."),
                Operation::DeleteFile => format!("Removed {name} from replica folder."),
                Operation::DeleteDir => format!("Removed directory {name} from replica folder."),
                Operation::NoOp => format!("{name} is up to date."),
            },
            Outcome::Planned => format!("[dry-run] would {}.", phrase(self.operation, name)),
            Outcome::Failure(reason) => {
                format!("Failed to {}: {reason}", phrase(self.operation, name))
            }
        }
    }
}

fn phrase(operation: Operation, name: &EntryName) -> String {
    match operation {
        Operation::CreateFile => format!("copy {name} to replica folder"),
        Operation::CreateDir => format!("copy directory {name} to replica folder"),
        Operation::UpdateFile => format!("update {name} in replica folder"),
        Operation::DeleteFile => format!("remove {name} from replica folder"),
        Operation::DeleteDir => format!("remove directory {name} from replica folder"),
        Operation::NoOp => format!("check {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_path_joins_single_segment() {
        let root = TreeRoot::new(Role::Replica, PathBuf::from("/srv/replica"));
        let path = root.entry_path(&EntryName::from("a.txt"));
        assert_eq!(path, PathBuf::from("/srv/replica/a.txt"));
    }

    #[test]
    fn only_noop_leaves_replica_alone() {
        assert!(!Operation::NoOp.mutates());
        assert!(Operation::DeleteDir.mutates());
        assert!(Operation::UpdateFile.mutates());
    }

    #[test]
    fn describe_success_messages() {
        let action =
            ReconciliationAction::new("b".into(), Operation::CreateDir, Some(EntryKind::Directory));
        assert_eq!(
            ExecutionResult::success(&action).describe(),
            "Copied directory b to replica folder."
        );

        let action =
            ReconciliationAction::new("a.txt".into(), Operation::UpdateFile, Some(EntryKind::RegularFile));
        assert_eq!(
            ExecutionResult::success(&action).describe(),
            "Updated a.txt in replica folder."
        );
    }

    #[test]
    fn describe_failure_includes_operation_and_reason() {
        let result =
            ExecutionResult::failure("old.txt".into(), Operation::DeleteFile, "permission denied");
        assert!(result.is_failure());
        assert_eq!(
            result.describe(),
            "Failed to remove old.txt from replica folder: permission denied"
        );
    }

    #[test]
    fn describe_planned_uses_dry_run_prefix() {
        let action =
            ReconciliationAction::new("old".into(), Operation::DeleteDir, Some(EntryKind::Directory));
        assert_eq!(
            ExecutionResult::planned(&action).describe(),
            "[dry-run] would remove directory old from replica folder."
        );
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let result = ExecutionResult::failure("x".into(), Operation::CreateFile, "gone");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["name"], "x");
        assert_eq!(json["operation"], "create_file");
        assert_eq!(json["outcome"]["status"], "failure");
        assert_eq!(json["outcome"]["reason"], "gone");
    }
}
