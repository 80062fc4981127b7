//! Replica: keep a directory's top-level contents identical to another's.
//!
//! # Usage
//!
//! ```text
//! replica <SOURCE> <REPLICA> [--interval <SECS>] [--log-file <PATH>]
//! replica <SOURCE> <REPLICA> --once [--dry-run] [--json]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use replica_core::{SyncConfig, DEFAULT_INTERVAL, DEFAULT_LOG_FILE};
use replica_daemon::{init_tracing, start_blocking, EventLog};
use replica_sync::run_pass;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "replica",
    version,
    about = "One-way mirror of a source folder's top-level entries into a replica folder",
    long_about = None,
)]
struct Cli {
    /// Folder to mirror from. Never modified.
    source: PathBuf,

    /// Folder to mirror into. Must already exist.
    replica: PathBuf,

    /// Seconds to wait between the end of one pass and the start of the next.
    #[arg(
        long,
        visible_alias = "sync-interval",
        alias = "sync_interval",
        default_value_t = DEFAULT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    interval: u64,

    /// File that every create, update, delete and failure is appended to.
    #[arg(long, alias = "log_file", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Run a single pass and exit; non-zero status if any action failed.
    #[arg(long)]
    once: bool,

    /// Report what would change without touching the replica.
    #[arg(long)]
    dry_run: bool,

    /// Print the pass report as JSON instead of log lines.
    #[arg(long, requires = "once")]
    json: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut log = EventLog::open(&cli.log_file)
        .with_context(|| format!("cannot open log file {}", cli.log_file.display()))?;
    if cli.json {
        log = log.quiet();
    }

    let config = match SyncConfig::new(&cli.source, &cli.replica, Duration::from_secs(cli.interval))
    {
        Ok(config) => config.with_dry_run(cli.dry_run),
        Err(err) => {
            log.record(&err.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.once {
        let report = run_pass(&config, &mut log).context("sync pass failed")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to render pass report")?
            );
        }
        return Ok(if report.is_clean() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    start_blocking(config, log).context("sync loop exited with error")?;
    Ok(ExitCode::SUCCESS)
}
