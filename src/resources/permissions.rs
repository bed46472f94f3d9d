//! Executable-bit inspection and manipulation.
//!
//! The user, group and other execute bits are treated as one unit: they are
//! set together and cleared together.  Read/write and special bits
//! (setuid, setgid, sticky) are never touched.  On non-Unix platforms files
//! are never executable and the setters are no-ops.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Mask of the user, group and other execute bits.
#[cfg(unix)]
const EXEC_BITS: u32 = 0o111;

/// Return `true` if the user execute bit of `path` is set.
///
/// # Errors
///
/// Returns an error if the file's metadata cannot be read.
pub fn is_executable(path: &Path) -> Result<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)
            .with_context(|| format!("stat: {}", path.display()))?
            .permissions()
            .mode();
        Ok(mode & 0o100 != 0)
    }

    #[cfg(not(unix))]
    {
        std::fs::metadata(path).with_context(|| format!("stat: {}", path.display()))?;
        Ok(false)
    }
}

/// Set or clear all three execute bits of `path` to match `executable`.
///
/// # Errors
///
/// Returns an error if the file's permissions cannot be read or changed.
pub fn set_executable(path: &Path, executable: bool) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)
            .with_context(|| format!("stat: {}", path.display()))?
            .permissions()
            .mode();
        let new_mode = if executable {
            mode | EXEC_BITS
        } else {
            mode & !EXEC_BITS
        };
        if new_mode != mode {
            tracing::debug!("chmod {:o} {}", new_mode & 0o7777, path.display());
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(new_mode))
                .with_context(|| format!("set permissions: {}", path.display()))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = executable;
        std::fs::metadata(path).with_context(|| format!("stat: {}", path.display()))?;
        Ok(())
    }
}
