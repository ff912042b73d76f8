//! Filesystem guards.
//! Every write, directory creation and clone goes through these checks so
//! that re-running a command never clobbers existing work.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Outcome of a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Target already existed and was left untouched
    Skipped,
}

/// Writes `content` to `path` unless something already exists there.
///
/// Parent directories are created as needed.
///
/// # Arguments
/// * `label` - Human readable name used in the skip warning
/// * `path` - Destination file
/// * `content` - File content
///
/// # Returns
/// * `Result<WriteOutcome>` - Whether the file was written or skipped
pub fn write_if_absent<P: AsRef<Path>>(label: &str, path: P, content: &str) -> Result<WriteOutcome> {
    let path = path.as_ref();
    if path.exists() {
        warn!("Skipping: {} already exists ({}).", label, path.display());
        return Ok(WriteOutcome::Skipped);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    debug!("Writing file: {}", path.display());
    fs::write(path, content).map_err(Error::IoError)?;
    Ok(WriteOutcome::Written)
}

/// Creates a single directory unless it already exists.
///
/// # Returns
/// * `Result<bool>` - `true` when this call created the directory
pub fn create_dir_if_absent<P: AsRef<Path>>(label: &str, path: P) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        warn!("Skipping: {} already exists.", label);
        return Ok(false);
    }
    debug!("Creating directory: {}", path.display());
    fs::create_dir(path).map_err(Error::IoError)?;
    Ok(true)
}

/// Returns true when `path` does not exist or is an empty directory.
pub fn is_empty_dir<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(true);
    }
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Fails with `Error::DirectoryNotEmpty` unless `path` is empty or missing.
pub fn ensure_empty_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if is_empty_dir(path)? {
        Ok(())
    } else {
        Err(Error::DirectoryNotEmpty { dir: path.display().to_string() })
    }
}

/// Removes a file or directory tree. Missing paths are not an error.
pub fn remove_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::IoError(e)),
    };
    debug!("Removing: {}", path.display());
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(Error::IoError)
    } else {
        fs::remove_file(path).map_err(Error::IoError)
    }
}

/// Removes everything inside `path` but keeps the directory itself.
pub fn clear_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(path)? {
        remove_path(entry?.path())?;
    }
    Ok(())
}
