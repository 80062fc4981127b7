//! Replica core library — domain types, validated configuration, errors.
//!
//! Public API surface:
//! - [`types`] — entry names, kinds, reconciliation actions, execution results
//! - [`config`] — [`SyncConfig`] and startup validation of the two roots
//! - [`error`] — [`ValidationError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{SyncConfig, DEFAULT_INTERVAL, DEFAULT_LOG_FILE};
pub use error::ValidationError;
pub use types::{
    EntryKind, EntryName, ExecutionResult, Operation, Outcome, ReconciliationAction, Role,
    TreeRoot,
};
