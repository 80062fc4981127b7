use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use replica_core::SyncConfig;
use replica_sync::{run_pass, PassReport, Reporter, SyncError};

use crate::error::{io_err, DaemonError};

/// Start the sync loop and block the current thread until Ctrl-C.
pub fn start_blocking<R>(config: SyncConfig, reporter: R) -> Result<(), DaemonError>
where
    R: Reporter + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;

    runtime.block_on(async move {
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(4);

        let signal_handle = {
            let shutdown = shutdown_tx.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => tracing::info!("received ctrl-c, stopping after current pass"),
                    Err(err) => tracing::error!(error = %err, "ctrl-c handler failed"),
                }
                let _ = shutdown.send(());
            })
        };

        let result = run(config, reporter, shutdown_rx).await;
        signal_handle.abort();
        result
    })
}

/// Run passes forever, `config.interval` apart, until `shutdown` fires.
///
/// Each pass runs to completion on the blocking pool; the interval is measured
/// from the end of one pass to the start of the next, so a slow pass delays
/// the schedule instead of overlapping with it. A pass whose listing fails is
/// logged and retried on the next tick.
pub async fn run<R>(
    config: SyncConfig,
    mut reporter: R,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), DaemonError>
where
    R: Reporter + Send + 'static,
{
    tracing::info!(
        source = %config.source,
        replica = %config.replica,
        interval_secs = config.interval.as_secs(),
        dry_run = config.dry_run,
        "sync loop started",
    );

    let mut pass = 0u64;
    loop {
        pass += 1;
        let started = Instant::now();
        let pass_config = config.clone();
        let (returned, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = run_pass(&pass_config, &mut reporter);
            (reporter, outcome)
        })
        .await
        .map_err(|err| DaemonError::Join {
            task: "sync pass",
            reason: err.to_string(),
        })?;
        reporter = returned;

        log_pass(pass, outcome, started.elapsed());

        tokio::select! {
            _ = shutdown.recv() => break,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }

    tracing::info!(passes = pass, "sync loop stopped");
    Ok(())
}

fn log_pass(pass: u64, outcome: Result<PassReport, SyncError>, elapsed: Duration) {
    match outcome {
        Ok(report) => tracing::info!(
            pass,
            applied = report.applied(),
            unchanged = report.unchanged(),
            planned = report.planned(),
            failed = report.failed(),
            duration_ms = elapsed.as_millis(),
            "sync pass completed",
        ),
        Err(err) => tracing::error!(pass, error = %err, "sync pass failed"),
    }
}

/// Install the stderr `tracing` subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
