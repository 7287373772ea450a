//! Per-day log file sink.

use chrono::{DateTime, Local, NaiveDate};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::sink::DiagnosticsSink;

/// Application tag embedded in log file names.
pub const LOG_FILE_TAG: &str = "kafka-connector";

/// Format one log line: `<timestamp>   (<process-id>)   <message>`.
pub fn format_line(at: DateTime<Local>, pid: u32, message: &str) -> String {
    format!(
        "{}   ({})   {}\n",
        at.format("%Y-%m-%d %H:%M:%S%.3f"),
        pid,
        message
    )
}

/// Appends lines to `<dir>/<host>.kafka-connector.<YYYY-MM-DD>.log`.
///
/// `dir` is the configured log directory when it exists, otherwise the
/// system temporary directory. A new file starts every day.
#[derive(Debug, Clone)]
pub struct DailyFileSink {
    log_path: Option<PathBuf>,
    host: String,
}

impl DailyFileSink {
    pub fn new(log_path: Option<PathBuf>) -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        Self { log_path, host }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// The directory lines are written to right now.
    pub fn directory(&self) -> PathBuf {
        match &self.log_path {
            Some(dir) if dir.is_dir() => dir.clone(),
            _ => std::env::temp_dir(),
        }
    }

    pub fn file_name(&self, day: NaiveDate) -> String {
        format!("{}.{}.{}.log", self.host, LOG_FILE_TAG, day.format("%Y-%m-%d"))
    }

    pub fn file_path(&self, day: NaiveDate) -> PathBuf {
        self.directory().join(self.file_name(day))
    }

    fn append(path: &Path, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())
    }
}

impl DiagnosticsSink for DailyFileSink {
    fn log(&self, message: &str) {
        let now = Local::now();
        let path = self.file_path(now.date_naive());
        let line = format_line(now, std::process::id(), message);
        if let Err(e) = Self::append(&path, &line) {
            eprintln!("Log error: {}: {e}", path.display());
        }
    }
}
