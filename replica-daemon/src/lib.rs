//! Sync loop runtime and the persistent event log.

mod error;
pub mod event_log;
mod runtime;

pub use error::DaemonError;
pub use event_log::EventLog;
pub use runtime::{init_tracing, run, start_blocking};
