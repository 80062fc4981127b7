//! # replica-sync
//!
//! Top-level reconciliation of a replica directory against a source directory.
//!
//! Call [`run_pass`] to list both roots, plan one action per entry name and
//! apply every action. The building blocks are exposed for callers that
//! need them separately: [`compare`] decides byte equality, [`reconcile`]
//! plans actions from two [`Listing`]s and [`execute`] applies one action.

pub mod compare;
pub mod error;
pub mod execute;
pub mod listing;
pub mod pass;
pub mod reconcile;

pub use compare::files_equal;
pub use error::{CompareError, SyncError};
pub use execute::execute;
pub use listing::Listing;
pub use pass::{run_pass, PassReport, Reporter};
pub use reconcile::{reconcile, reconcile_roots, Planned};
