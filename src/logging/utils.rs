//! Log file location, ANSI stripping, and timestamps.
use std::fs;
use std::path::PathBuf;

/// Remove terminal escape sequences so log files stay plain text.
///
/// CSI sequences (`ESC [` ... final byte in `@`..=`~`) are dropped whole;
/// any other escape drops only the character following `ESC`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'[').is_some() {
            for inner in chars.by_ref() {
                if ('@'..='~').contains(&inner) {
                    break;
                }
            }
        } else {
            chars.next();
        }
    }
    out
}

/// Directory holding per-command log files, created on demand.
///
/// `$XDG_CACHE_HOME/dotplate`, falling back to `~/.cache/dotplate`.
pub(super) fn log_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map_or_else(
            || PathBuf::from(shellexpand::tilde("~/.cache").into_owned()),
            PathBuf::from,
        );
    let dir = base.join("dotplate");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Path of the log file for `command`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Local date and time for the run header, e.g. `2024-05-01 13:37:00 +02:00`.
pub(super) fn run_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

/// Local time of day for individual log lines, e.g. `13:37:00.123`.
pub(super) fn line_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}
