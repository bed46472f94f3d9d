//! File-system helpers for reading and replacing destination files.
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Read `path` as UTF-8 text, returning `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not UTF-8.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read: {}", path.display())),
    }
}

/// Return the path of the backup copy for `path`: the file name with `ext`
/// appended (e.g. `.bashrc` + `.dotplate.bak`).
#[must_use]
pub fn backup_path(path: &Path, ext: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    name.push(ext);
    path.with_file_name(name)
}

/// Copy `path` to its backup location, replacing any earlier backup.
///
/// Returns the backup path.
///
/// # Errors
///
/// Returns an error if the copy fails.
pub fn backup_file(path: &Path, ext: &str) -> Result<PathBuf> {
    let backup = backup_path(path, ext);
    std::fs::copy(path, &backup)
        .with_context(|| format!("back up {} to {}", path.display(), backup.display()))?;
    Ok(backup)
}

/// The file a symbolic link at `path` points to, or `None` if `path` is not
/// a link.  A dangling link resolves to the path it names.
fn resolve_link(path: &Path) -> Result<Option<PathBuf>> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {}
        _ => return Ok(None),
    }
    if let Ok(target) = dunce::canonicalize(path) {
        return Ok(Some(target));
    }
    let target = std::fs::read_link(path).with_context(|| format!("readlink: {}", path.display()))?;
    Ok(Some(path.parent().map_or_else(|| target.clone(), |dir| dir.join(&target))))
}

/// Replace the contents of `path` with `content`, creating parent
/// directories first.
///
/// The text is staged in a sibling file that is then renamed over `path`, so
/// readers never observe a partially written file.  When `path` is a
/// symbolic link the file it points to is replaced and the link is kept.  The permissions of an
/// existing file are carried over to the replacement.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    let resolved = resolve_link(path)?;
    let path = resolved.as_deref().unwrap_or(path);
    ensure_parent_dir(path)?;

    let mut tmp_name = path
        .file_name()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    tmp_name.push(".dotplate_tmp");
    let tmp = path.with_file_name(tmp_name);

    let cleanup = || {
        let _ = std::fs::remove_file(&tmp);
    };

    std::fs::write(&tmp, content).with_context(|| format!("write: {}", tmp.display()))?;
    if let Ok(meta) = std::fs::metadata(path)
        && let Err(e) = std::fs::set_permissions(&tmp, meta.permissions())
    {
        cleanup();
        return Err(e).with_context(|| format!("copy permissions to {}", tmp.display()));
    }
    if let Err(e) = std::fs::rename(&tmp, path) {
        cleanup();
        return Err(e).with_context(|| format!("rename {} to {}", tmp.display(), path.display()));
    }
    Ok(())
}
