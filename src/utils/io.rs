//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Mode applied to written files on Unix.
pub const FILE_MODE: u32 = 0o644;

/// Read file contents, distinguishing a missing file from other I/O failures.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::input_not_found(path.display().to_string())
        } else {
            Error::input_read_failed(path.display().to_string(), e.to_string())
        }
    })
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| {
                Error::output_write_failed(
                    path.display().to_string(),
                    format!("create directory {}: {}", parent.display(), e),
                )
            })
        }
        _ => Ok(()),
    }
}

/// Overwrite `path` with `content`, creating parent directories and
/// applying [`FILE_MODE`].
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;

    fs::write(path, content)
        .map_err(|e| Error::output_write_failed(path.display().to_string(), e.to_string()))?;

    set_file_mode(path)
}

#[cfg(unix)]
fn set_file_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE)).map_err(|e| {
        Error::output_write_failed(path.display().to_string(), format!("set mode: {}", e))
    })
}

#[cfg(not(unix))]
fn set_file_mode(_path: &Path) -> Result<()> {
    Ok(())
}
