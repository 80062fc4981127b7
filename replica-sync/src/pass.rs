//! One sync pass: list both roots, reconcile, apply every action.
//!
//! Passes keep no state between runs. Everything is re-derived from what is
//! on disk, so a failed action is simply planned again next time.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use replica_core::{ExecutionResult, Operation, Outcome, SyncConfig};

use crate::error::SyncError;
use crate::execute::execute;
use crate::listing::Listing;
use crate::reconcile::{reconcile_roots, Planned};

/// Receives every execution result as soon as it is known.
pub trait Reporter {
    fn report(&mut self, result: &ExecutionResult);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, result: &ExecutionResult) {
        (**self).report(result);
    }
}

/// Collects results in memory.
impl Reporter for Vec<ExecutionResult> {
    fn report(&mut self, result: &ExecutionResult) {
        self.push(result.clone());
    }
}

/// Summary of a finished pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub results: Vec<ExecutionResult>,
    pub duration_ms: u128,
}

impl PassReport {
    /// Actions that changed the replica.
    pub fn applied(&self) -> usize {
        self.count(|r| r.operation.mutates() && r.outcome == Outcome::Success)
    }

    pub fn unchanged(&self) -> usize {
        self.count(|r| r.operation == Operation::NoOp && r.outcome == Outcome::Success)
    }

    pub fn planned(&self) -> usize {
        self.count(|r| r.outcome == Outcome::Planned)
    }

    pub fn failed(&self) -> usize {
        self.count(ExecutionResult::is_failure)
    }

    /// `true` when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&ExecutionResult) -> bool) -> usize {
        self.results.iter().filter(|r| pred(*r)).count()
    }
}

/// Run a single pass over the roots in `config`.
///
/// Only a listing failure fails the whole pass. Per-action failures are
/// reported and recorded in the returned [`PassReport`].
pub fn run_pass(config: &SyncConfig, mut reporter: impl Reporter) -> Result<PassReport, SyncError> {
    let started_at = Utc::now();
    let started = Instant::now();

    let source = Listing::read(&config.source)?;
    let replica = Listing::read(&config.replica)?;
    let planned = reconcile_roots(&config.source, &config.replica, &source, &replica);
    let results = apply_plan(planned, config, &mut reporter);

    let report = PassReport {
        started_at,
        dry_run: config.dry_run,
        results,
        duration_ms: started.elapsed().as_millis(),
    };
    tracing::info!(
        "pass finished: {} applied, {} unchanged, {} planned, {} failed in {}ms",
        report.applied(),
        report.unchanged(),
        report.planned(),
        report.failed(),
        report.duration_ms
    );
    Ok(report)
}

pub(crate) fn apply_plan(
    planned: Vec<Planned>,
    config: &SyncConfig,
    reporter: &mut impl Reporter,
) -> Vec<ExecutionResult> {
    let mut results = Vec::with_capacity(planned.len());
    for item in planned {
        let result = match item {
            Ok(action) if config.dry_run && action.operation.mutates() => {
                ExecutionResult::planned(&action)
            }
            Ok(action) => execute(&action, &config.source, &config.replica),
            Err(err) => {
                tracing::warn!("{err}");
                ExecutionResult::failure(err.name, Operation::UpdateFile, err.source.to_string())
            }
        };
        reporter.report(&result);
        results.push(result);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use replica_core::{EntryKind, ReconciliationAction, DEFAULT_INTERVAL};
    use std::fs;
    use tempfile::TempDir;

    fn config(source: &TempDir, replica: &TempDir) -> SyncConfig {
        SyncConfig::new(source.path(), replica.path(), DEFAULT_INTERVAL).unwrap()
    }

    #[test]
    fn failed_action_does_not_stop_the_rest() {
        let _ = env_logger::builder().is_test(true).try_init();
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("real.txt"), "x").unwrap();

        let planned = vec![
            Ok(ReconciliationAction::new(
                "ghost.txt".into(),
                Operation::CreateFile,
                Some(EntryKind::RegularFile),
            )),
            Ok(ReconciliationAction::new(
                "real.txt".into(),
                Operation::CreateFile,
                Some(EntryKind::RegularFile),
            )),
        ];

        let mut seen: Vec<ExecutionResult> = Vec::new();
        let results = apply_plan(planned, &config(&source, &replica), &mut seen);

        assert_eq!(results.len(), 2);
        assert!(results[0].is_failure());
        assert_eq!(results[1].outcome, Outcome::Success);
        assert_eq!(seen, results, "every result is reported");
        assert!(replica.path().join("real.txt").exists());
    }

    #[test]
    fn compare_failure_becomes_failed_update_and_pass_continues() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("real.txt"), "x").unwrap();

        let planned = vec![
            Err(CompareError {
                name: "gone.txt".into(),
                source: SyncError::Io {
                    path: source.path().join("gone.txt"),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                },
            }),
            Ok(ReconciliationAction::new(
                "real.txt".into(),
                Operation::CreateFile,
                Some(EntryKind::RegularFile),
            )),
        ];

        let mut seen: Vec<ExecutionResult> = Vec::new();
        let results = apply_plan(planned, &config(&source, &replica), &mut seen);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name.to_string(), "gone.txt");
        assert_eq!(results[0].operation, Operation::UpdateFile);
        match &results[0].outcome {
            Outcome::Failure(reason) => assert!(reason.contains("gone.txt"), "got: {reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(results[1].outcome, Outcome::Success);
        assert_eq!(seen, results, "comparison failure must reach the reporter");
        assert!(replica.path().join("real.txt").exists());
    }

    #[test]
    fn dry_run_plans_without_touching_replica() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("new.txt"), "x").unwrap();
        fs::write(replica.path().join("old.txt"), "y").unwrap();

        let config = config(&source, &replica).with_dry_run(true);
        let report = run_pass(&config, Vec::<ExecutionResult>::new()).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.planned(), 2);
        assert_eq!(report.applied(), 0);
        assert!(!replica.path().join("new.txt").exists());
        assert!(replica.path().join("old.txt").exists());
    }

    #[test]
    fn report_counts() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("same.txt"), "s").unwrap();
        fs::write(replica.path().join("same.txt"), "s").unwrap();
        fs::write(source.path().join("new.txt"), "n").unwrap();

        let report = run_pass(&config(&source, &replica), Vec::<ExecutionResult>::new()).unwrap();
        assert_eq!(report.applied(), 1);
        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.failed(), 0);
        assert!(report.is_clean());
    }

    #[test]
    fn report_serializes_results() {
        let source = TempDir::new().unwrap();
        let replica = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "x").unwrap();

        let report = run_pass(&config(&source, &replica), Vec::<ExecutionResult>::new()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["name"], "a.txt");
        assert_eq!(json["results"][0]["operation"], "create_file");
        assert_eq!(json["results"][0]["outcome"]["status"], "success");
    }
}
