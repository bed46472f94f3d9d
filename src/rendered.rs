//! Rendered template output and its comparison with the destination.
use anyhow::Result;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::resources::ResourceChange;
use crate::resources::{fs, permissions};

/// How the destination's content compares with the rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffState {
    /// The destination file does not exist.
    Missing,
    /// The destination exists with different content.
    Changed,
    /// The destination content is identical.
    NoDiff,
}

impl DiffState {
    /// Return `true` unless the content already matches.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::NoDiff)
    }
}

/// How the destination's executable bit compares with the source's.
///
/// `Added` and `Removed` name the bit as it stands on the destination
/// relative to the source: `Added` means the destination has a bit the
/// source lacks (install will clear it), `Removed` means the destination
/// lacks a bit the source has (install will set it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XBitDiff {
    /// Destination is executable, source is not.
    Added,
    /// Source is executable, destination is not.
    Removed,
    /// Both agree.
    NoChange,
    /// Destination is missing; it will be created executable.
    MissingSet,
    /// Destination is missing; it will be created without the bit.
    MissingUnset,
}

impl XBitDiff {
    /// Compare the executable bits of an existing destination and its source.
    #[must_use]
    pub const fn between(src_executable: bool, dest_executable: bool) -> Self {
        match (src_executable, dest_executable) {
            (true, false) => Self::Removed,
            (false, true) => Self::Added,
            _ => Self::NoChange,
        }
    }

    /// Executable-bit diff for a destination that does not exist yet.
    #[must_use]
    pub const fn missing(src_executable: bool) -> Self {
        if src_executable {
            Self::MissingSet
        } else {
            Self::MissingUnset
        }
    }

    /// Return `true` if installing would change the destination's mode.
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Added | Self::Removed | Self::MissingSet)
    }
}

/// Difference between a rendered file and its installed destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    /// Mode-change notice (if any) followed by a unified diff.
    pub delta: String,
    /// Content comparison.
    pub state: DiffState,
    /// Executable-bit comparison.
    pub xbit_diff: XBitDiff,
}

impl Diff {
    /// Return `true` if installing would change anything.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.state.is_change() || self.xbit_diff.is_change()
    }

    fn settled() -> Self {
        Self {
            delta: String::new(),
            state: DiffState::NoDiff,
            xbit_diff: XBitDiff::NoChange,
        }
    }
}

/// The rendered text of one template together with where it goes.
///
/// The diff against the destination is computed on first use and cached for
/// the lifetime of the value.
pub struct RenderedFile {
    content: String,
    template: String,
    dest_path: PathBuf,
    executable: bool,
    backup_ext: String,
    diff: RefCell<Option<Diff>>,
}

impl fmt::Debug for RenderedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedFile")
            .field("template", &self.template)
            .field("dest_path", &self.dest_path)
            .field("executable", &self.executable)
            .field("backup_ext", &self.backup_ext)
            .finish_non_exhaustive()
    }
}

impl RenderedFile {
    /// Create a rendered file destined for `dest_path`.
    #[must_use]
    pub fn new(
        content: String,
        template: impl Into<String>,
        dest_path: PathBuf,
        executable: bool,
        backup_ext: impl Into<String>,
    ) -> Self {
        Self {
            content,
            template: template.into(),
            dest_path,
            executable,
            backup_ext: backup_ext.into(),
            diff: RefCell::new(None),
        }
    }

    /// The rendered text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Identifier of the template this was rendered from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Where the file is installed.
    #[must_use]
    pub fn dest_path(&self) -> &Path {
        &self.dest_path
    }

    /// Whether the source template is executable.
    #[must_use]
    pub const fn executable(&self) -> bool {
        self.executable
    }

    /// Suffix used for the backup of an overwritten destination.
    #[must_use]
    pub fn backup_ext(&self) -> &str {
        &self.backup_ext
    }

    /// Compare with the destination file.
    ///
    /// The destination is read at most once per value.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination exists but cannot be read as
    /// UTF-8 text or its permissions cannot be inspected.
    pub fn diff(&self) -> Result<Diff> {
        let cached = self.diff.borrow().clone();
        if let Some(diff) = cached {
            return Ok(diff);
        }
        let diff = self.compute_diff()?;
        *self.diff.borrow_mut() = Some(diff.clone());
        Ok(diff)
    }

    fn compute_diff(&self) -> Result<Diff> {
        let (existing, state, xbit_diff) = match fs::read_optional(&self.dest_path)? {
            None => (String::new(), DiffState::Missing, XBitDiff::missing(self.executable)),
            Some(existing) => {
                let state = if existing == self.content {
                    DiffState::NoDiff
                } else {
                    DiffState::Changed
                };
                let dest_executable = permissions::is_executable(&self.dest_path)?;
                let xbit_diff = XBitDiff::between(self.executable, dest_executable);
                (existing, state, xbit_diff)
            }
        };

        let mode = |x: bool| if x { "+x" } else { "-x" };
        let mut delta = if matches!(xbit_diff, XBitDiff::Added | XBitDiff::Removed) {
            format!(
                "old mode {}\nnew mode {}\n",
                mode(!self.executable),
                mode(self.executable)
            )
        } else {
            String::new()
        };
        delta.push_str(
            &similar::TextDiff::from_lines(existing.as_str(), self.content.as_str())
                .unified_diff()
                .context_radius(3)
                .header(&self.template, &self.dest_path.to_string_lossy())
                .to_string(),
        );

        tracing::debug!(
            "diff {}: {state:?}, {xbit_diff:?}",
            self.dest_path.display()
        );
        Ok(Diff {
            delta,
            state,
            xbit_diff,
        })
    }

    /// Write the rendered file to its destination if anything differs.
    ///
    /// An existing destination with different content is first copied to
    /// its backup path.  The executable bit is then set to match the
    /// source.  Installing twice in a row is a no-op the second time.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup, write or permission change fails.
    pub fn install(&self) -> Result<ResourceChange> {
        let diff = self.diff()?;
        if !diff.has_changes() {
            tracing::debug!("{} is up to date", self.dest_path.display());
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if diff.state.is_change() {
            if diff.state == DiffState::Changed {
                let backup = fs::backup_file(&self.dest_path, &self.backup_ext)?;
                tracing::debug!("backed up {} to {}", self.dest_path.display(), backup.display());
            }
            fs::write_file(&self.dest_path, &self.content)?;
            tracing::debug!("wrote {}", self.dest_path.display());
        }
        permissions::set_executable(&self.dest_path, self.executable)?;
        *self.diff.borrow_mut() = Some(Diff::settled());
        Ok(ResourceChange::Applied)
    }

    /// Install the same content under `dir` instead of the destination root.
    ///
    /// # Errors
    ///
    /// Returns an error if installation fails.
    pub fn install_in_dir(&self, dir: &Path) -> Result<ResourceChange> {
        Self::new(
            self.content.clone(),
            self.template.clone(),
            dir.join(&self.template),
            self.executable,
            self.backup_ext.clone(),
        )
        .install()
    }
}
