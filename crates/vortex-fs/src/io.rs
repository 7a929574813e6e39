//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, Result};

/// Tuning for atomic writes.
#[derive(Debug, Clone, Copy)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up.
    pub lock_timeout: Duration,
    /// Whether to fsync the temp file before the rename.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(10),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers (including systemd) never
/// observe a partial unit file. An advisory lock on the hidden sibling
/// `.<file>.lock` guards against two writers racing on the same target; it is
/// retried with exponential backoff until `config.lock_timeout` elapses. The
/// lock file stays while the target exists so every writer locks the same
/// inode; [`remove_file`] deletes both.
pub fn write_atomic(path: &Path, content: &[u8], config: RobustnessConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let lock_path = lock_path(path);
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| Error::io(&lock_path, e))?;

    acquire_lock(&lock_file, path, config.lock_timeout)?;

    let result = write_via_temp(path, content, config.enable_fsync);

    if let Err(e) = &result {
        tracing::debug!(path = %path.display(), error = %e, "Atomic write failed");
    }

    // Lock is released when `lock_file` drops.
    result
}

fn acquire_lock(lock_file: &fs::File, target: &Path, timeout: Duration) -> Result<()> {
    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(250),
        max_elapsed_time: Some(timeout),
        ..ExponentialBackoff::default()
    };

    backoff::retry(policy, || {
        lock_file
            .try_lock_exclusive()
            .map_err(backoff::Error::transient)
    })
    .map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })
}

fn write_via_temp(native_path: &Path, content: &[u8], fsync: bool) -> Result<()> {
    // Temp file lives in the same directory so the rename stays on one filesystem.
    let temp_path = sibling(native_path, |name| {
        format!(".{}.{}.tmp", name, std::process::id())
    });

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = temp_file
        .write_all(content)
        .and_then(|()| if fsync { temp_file.sync_all() } else { Ok(()) });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(native_path, e));
    }

    Ok(())
}

/// Hidden lock file guarding writes to `path`.
pub fn lock_path(path: &Path) -> PathBuf {
    sibling(path, |name| format!(".{}.lock", name))
}

fn sibling(path: &Path, name_fn: impl FnOnce(&str) -> String) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(name_fn(&name))
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically with default robustness settings.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

/// Remove a file along with the lock file left by [`write_atomic`].
///
/// Returns `Ok(false)` if the file did not exist.
pub fn remove_file(path: &Path) -> Result<bool> {
    let removed = match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(Error::io(path, e)),
    };

    let lock = lock_path(path);
    match fs::remove_file(&lock) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::debug!(path = %lock.display(), error = %e, "Could not remove lock file");
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn temp_file_is_renamed_into_place() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unit.service");

        write_text(&path, "content").unwrap();

        let mut names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![".unit.service.lock".to_string(), "unit.service".to_string()]);
    }

    #[test]
    fn remove_file_reports_absence() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone.service");

        assert!(!remove_file(&path).unwrap());

        fs::write(&path, "x").unwrap();
        assert!(remove_file(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn remove_file_leaves_no_lock_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unit.service");
        write_text(&path, "content").unwrap();
        assert!(lock_path(&path).is_file());

        assert!(remove_file(&path).unwrap());

        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
