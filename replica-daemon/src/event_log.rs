//! Append-only event log mirrored to stdout.
//!
//! One line per event: `[YYYY-MM-DD HH:MM:SS] message`, local time, second
//! resolution.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use replica_core::{ExecutionResult, Operation, Outcome};
use replica_sync::Reporter;

use crate::error::{io_err, DaemonError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct EventLog {
    path: PathBuf,
    file: File,
    echo: Option<Box<dyn Write + Send>>,
}

impl EventLog {
    /// Open `path` for appending, creating it (and its parent) if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DaemonError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;
        Ok(Self {
            path,
            file,
            echo: Some(Box::new(std::io::stdout())),
        })
    }

    /// Stop mirroring lines to stdout (the file still gets every line).
    pub fn quiet(mut self) -> Self {
        self.echo = None;
        self
    }

    /// Mirror lines to `writer` instead of stdout.
    pub fn echo_to(mut self, writer: impl Write + Send + 'static) -> Self {
        self.echo = Some(Box::new(writer));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line and echo it.
    ///
    /// A failed write, to the file or to the echo (e.g. a closed stdout
    /// pipe), is logged and otherwise ignored; the mirror keeps running.
    pub fn record(&mut self, message: &str) {
        let line = format_line(Local::now(), message);
        if let Err(err) = writeln!(self.file, "{line}").and_then(|()| self.file.flush()) {
            tracing::warn!(path = %self.path.display(), error = %err, "event log write failed");
        }
        if let Some(echo) = self.echo.as_mut() {
            if let Err(err) = writeln!(echo, "{line}").and_then(|()| echo.flush()) {
                tracing::warn!(error = %err, "event log echo failed");
            }
        }
    }
}

impl Reporter for EventLog {
    fn report(&mut self, result: &ExecutionResult) {
        if result.operation == Operation::NoOp && result.outcome == Outcome::Success {
            tracing::debug!(name = %result.name, "unchanged");
            return;
        }
        self.record(&result.describe());
    }
}

pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("[{}] {message}", at.format(TIMESTAMP_FORMAT))
}
