//! Running `git` against the source tree.
use anyhow::{Context as _, Result, bail};
use std::path::Path;
use std::process::Command;

/// Captured result of a `git` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl GitOutput {
    /// Whether git exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Whether a `git` executable is on `PATH`.
#[must_use]
pub fn available() -> bool {
    which::which("git").is_ok()
}

/// Run `git <args>` in `dir` and capture its output whatever the exit code.
///
/// # Errors
///
/// Returns an error only if git cannot be spawned.
pub fn output(dir: &Path, args: &[&str]) -> Result<GitOutput> {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("running git {} in {}", args.join(" "), dir.display()))?;
    Ok(GitOutput {
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        code: out.status.code(),
    })
}

/// Run `git <args>` in `dir` and return its standard output.
///
/// # Errors
///
/// Returns an error if git cannot be spawned or exits non-zero.
pub fn stdout(dir: &Path, args: &[&str]) -> Result<String> {
    let out = output(dir, args)?;
    if !out.success() {
        bail!(
            "git {} failed in {} (exit {}): {}",
            args.join(" "),
            dir.display(),
            out.code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
            out.stderr.trim()
        );
    }
    Ok(out.stdout)
}
