//! Common file system operations with unified error handling

use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;
use crate::error::fs::io_failure;

/// Create the parent directory of `path` if it does not exist yet
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_failure(parent, e))?;
        }
    }
    Ok(())
}

/// Remove whatever non-directory sits at `path` (file or symlink, dangling included)
///
/// Returns `true` when something was removed.
pub fn remove_entry(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(io_failure(path, "is a directory")),
        Ok(_) => {
            fs::remove_file(path).map_err(|e| io_failure(path, e))?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_failure(path, e)),
    }
}

/// Point the symlink at `link` to `target`, replacing any file or link already there
pub fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    ensure_parent_dir(link)?;
    remove_entry(link)?;
    symlink_file(target, link).map_err(|e| io_failure(link, e))
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
