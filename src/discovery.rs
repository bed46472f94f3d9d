//! Template discovery: listing the files of the source tree.
//!
//! When the source root lives in a Git working tree and is tracked, only
//! committed files are listed, so scratch files can sit next to templates
//! without being installed.  Otherwise the directory is walked recursively.
//! Either way the result is a sorted list of forward-slash separated paths
//! relative to the root.
use anyhow::{Context as _, Result};
use std::fmt::Debug;
use std::path::Path;

use crate::git;

/// Outcome of probing a directory for Git tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoProbe {
    /// The directory is inside a Git working tree and contains tracked files.
    Tracked,
    /// Git is installed but the directory is not a tracked part of a working
    /// tree (including being inside a `.git` directory).
    Untracked,
    /// The `git` executable is not installed.
    ToolMissing,
}

/// Probe whether `dir` is under Git revision control.
#[must_use]
pub fn probe(dir: &Path) -> RepoProbe {
    if !git::available() {
        return RepoProbe::ToolMissing;
    }
    let inside = match git::output(dir, &["rev-parse", "--is-inside-work-tree"]) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("git probe failed in {}: {e:#}", dir.display());
            return RepoProbe::ToolMissing;
        }
    };
    // `rev-parse` succeeds with "false" inside a .git directory.
    if !inside.success() || inside.stdout.trim() == "false" {
        return RepoProbe::Untracked;
    }
    match git::output(dir, &["ls-files", "--error-unmatch", "."]) {
        Ok(r) if r.success() => RepoProbe::Tracked,
        _ => RepoProbe::Untracked,
    }
}

/// A strategy for listing the files under a source root.
pub trait FileLister: Debug {
    /// List the files under `root`, relative to it and forward-slash
    /// separated.  The order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be produced.
    fn list_files(&self, root: &Path) -> Result<Vec<String>>;
}

/// Lists the files committed to Git under the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLister;

impl FileLister for GitLister {
    fn list_files(&self, root: &Path) -> Result<Vec<String>> {
        let listing = git::stdout(root, &["ls-tree", "-r", "--name-only", "-z", "HEAD"])?;
        Ok(split_nul_terminated(&listing))
    }
}

/// Lists every entry under the root that is not a directory or a link to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkLister;

impl FileLister for WalkLister {
    fn list_files(&self, root: &Path) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("walking {}", root.display()))?;
            // Links are not followed by the walk; a link to a directory is
            // not a template either.
            if entry.file_type().is_dir() || entry.path().is_dir() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(root)
                .with_context(|| format!("{} is outside {}", entry.path().display(), root.display()))?;
            let parts: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            files.push(parts.join("/"));
        }
        Ok(files)
    }
}

/// Choose the lister appropriate for `root`.
#[must_use]
pub fn lister_for(root: &Path) -> Box<dyn FileLister> {
    let outcome = probe(root);
    tracing::debug!("git probe for {}: {outcome:?}", root.display());
    match outcome {
        RepoProbe::Tracked => Box::new(GitLister),
        RepoProbe::Untracked | RepoProbe::ToolMissing => Box::new(WalkLister),
    }
}

/// List the template files under `root` in sorted order.
///
/// # Errors
///
/// Returns an error if Git or the directory walk fails.
pub fn list_files(root: &Path) -> Result<Vec<String>> {
    let mut files = lister_for(root).list_files(root)?;
    files.sort();
    Ok(files)
}

/// Split NUL-terminated output into its entries.
fn split_nul_terminated(s: &str) -> Vec<String> {
    s.split_terminator('\0').map(str::to_string).collect()
}
