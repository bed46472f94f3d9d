//! Core logging types: per-file entries and their status.

/// Outcome of one template for summary reporting.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Template identifier.
    pub template: String,
    /// Final status of the file.
    pub status: FileStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The destination was created or updated.
    Installed,
    /// The destination already matched.
    Unchanged,
    /// The user declined the change.
    Skipped,
    /// Rendering or installation failed.
    Failed,
}

impl FileStatus {
    /// Icon and colour used in the summary.
    pub(super) const fn style(self) -> (&'static str, &'static str) {
        match self {
            Self::Installed => ("✓", "\x1b[32m"),
            Self::Unchanged => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}
