//! Unit file storage
//!
//! A unit file's presence is the local signal that a forward has been
//! provisioned. It says nothing about whether the unit is running.

use std::path::{Path, PathBuf};

use vortex_fs::{RobustnessConfig, SystemPath, checksum, io};

use crate::naming::ServiceId;

/// What a write did to the unit file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No file existed before
    Created,
    /// A file with different content was replaced
    Updated,
    /// The file already held this exact content
    Unchanged,
}

/// Persistent home of unit files, keyed by service identifier.
pub trait UnitStore {
    /// Where the unit for `id` lives.
    fn path(&self, id: &ServiceId) -> PathBuf;

    fn exists(&self, id: &ServiceId) -> bool;

    fn read(&self, id: &ServiceId) -> vortex_fs::Result<String>;

    /// Write `content` as the unit for `id`. Failures are fatal to the caller.
    fn write(&self, id: &ServiceId, content: &str) -> vortex_fs::Result<WriteOutcome>;

    /// Delete the unit for `id`, returning `false` if it was already absent.
    ///
    /// Cleanup paths are free to discard the error.
    fn remove(&self, id: &ServiceId) -> vortex_fs::Result<bool>;
}

/// Unit store backed by a directory such as `/etc/systemd/system`.
#[derive(Debug, Clone)]
pub struct FsUnitStore {
    dir: PathBuf,
    robustness: RobustnessConfig,
}

impl FsUnitStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            robustness: RobustnessConfig::default(),
        }
    }

    /// Store rooted at the system unit directory.
    pub fn system() -> Self {
        Self::new(SystemPath::SystemdUnitDir.as_str())
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl UnitStore for FsUnitStore {
    fn path(&self, id: &ServiceId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    fn exists(&self, id: &ServiceId) -> bool {
        self.path(id).is_file()
    }

    fn read(&self, id: &ServiceId) -> vortex_fs::Result<String> {
        io::read_text(&self.path(id))
    }

    fn write(&self, id: &ServiceId, content: &str) -> vortex_fs::Result<WriteOutcome> {
        let path = self.path(id);

        let outcome = match checksum::file_checksum(&path)? {
            None => WriteOutcome::Created,
            Some(existing) if existing == checksum::content_checksum(content.as_bytes()) => {
                tracing::debug!(unit = %id, "Unit file already up to date");
                return Ok(WriteOutcome::Unchanged);
            }
            Some(_) => WriteOutcome::Updated,
        };

        io::write_atomic(&path, content.as_bytes(), self.robustness)?;
        tracing::debug!(unit = %id, path = %path.display(), ?outcome, "Wrote unit file");
        Ok(outcome)
    }

    fn remove(&self, id: &ServiceId) -> vortex_fs::Result<bool> {
        io::remove_file(&self.path(id))
    }
}
