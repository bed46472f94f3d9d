//! Structured logger with per-file outcome collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::STAGE_TARGET;
use super::types::{FileEntry, FileStatus};
use super::utils::log_file_path;

/// Structured logger that records the outcome of every template.
///
/// All messages are written to a persistent log file at
/// `$XDG_CACHE_HOME/dotplate/<command>.log` (default
/// `~/.cache/dotplate/<command>.log`) with timestamps and ANSI codes
/// stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    files: Mutex<Vec<FileEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }
}

impl Logger {
    /// Record the outcome of one template for the summary.
    pub fn record_file(&self, template: &str, status: FileStatus, message: Option<&str>) {
        tracing::debug!(template, ?status, "recorded outcome");
        if let Ok(mut guard) = self.files.lock() {
            guard.push(FileEntry {
                template: template.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn file_entries(&self) -> Vec<FileEntry> {
        self.files.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the entries with `status`.
    #[must_use]
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.lock().map_or(0, |guard| {
            guard.iter().filter(|f| f.status == status).count()
        })
    }

    /// Print the summary of all recorded files.
    pub fn print_summary(&self) {
        let files = self.file_entries();
        if files.is_empty() {
            return;
        }

        self.stage("Summary");
        for file in files.iter().filter(|f| f.status != FileStatus::Unchanged) {
            let (icon, color) = file.status.style();
            let suffix = file
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", file.template));
        }

        self.info(&format!(
            "{} files: \x1b[32m{} installed\x1b[0m, \x1b[2m{} unchanged\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[31m{} failed\x1b[0m",
            files.len(),
            self.count(FileStatus::Installed),
            self.count(FileStatus::Unchanged),
            self.count(FileStatus::Skipped),
            self.count(FileStatus::Failed),
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.file_entries().is_empty(), "expected empty file list");
    }

    #[test]
    fn record_file_installed() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_file(".profile", FileStatus::Installed, None);
        let files = log.file_entries();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].template, ".profile");
        assert_eq!(files[0].status, FileStatus::Installed);
    }

    #[test]
    fn record_file_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_file(".vimrc", FileStatus::Skipped, Some("declined"));
        assert_eq!(log.file_entries()[0].message, Some("declined".to_string()));
    }

    #[test]
    fn count_by_status() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_file("a", FileStatus::Installed, None);
        log.record_file("b", FileStatus::Unchanged, None);
        log.record_file("c", FileStatus::Installed, None);
        log.record_file("d", FileStatus::Failed, Some("denied"));
        assert_eq!(log.count(FileStatus::Installed), 2);
        assert_eq!(log.count(FileStatus::Unchanged), 1);
        assert_eq!(log.count(FileStatus::Skipped), 0);
        assert_eq!(log.count(FileStatus::Failed), 1);
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        assert!(path.exists(), "log file should be created by the file layer");
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains(&marker));
    }

    #[test]
    fn warn_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("careful");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("WARN  careful"));
    }

    #[test]
    fn error_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.error("broken");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("ERROR broken"));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Installing");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("==> Installing"));
    }

    #[test]
    fn summary_written_to_file_without_ansi() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_file(".profile", FileStatus::Installed, None);
        log.record_file(".bashrc", FileStatus::Unchanged, None);
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("✓ .profile"));
        assert!(!contents.contains(".bashrc\n"));
        assert!(contents.contains("2 files: 1 installed, 1 unchanged, 0 skipped, 0 failed"));
        assert!(!contents.contains('\x1b'));
    }
}
