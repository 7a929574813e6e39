//! [`TestUnitDir`]: a temporary unit directory for engine tests.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use vortex_forward::{FsUnitStore, ServiceId};
use vortex_fs::RobustnessConfig;

/// A temporary directory standing in for `/etc/systemd/system`.
///
/// # Example
///
/// ```rust,no_run
/// use vortex_forward::ServiceId;
/// use vortex_test_utils::TestUnitDir;
///
/// let units = TestUnitDir::new();
/// units.write_unit(&ServiceId::legacy(80), "[Unit]\n");
/// units.assert_unit_exists(&ServiceId::legacy(80));
/// ```
pub struct TestUnitDir {
    temp_dir: TempDir,
}

impl Default for TestUnitDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUnitDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("TestUnitDir::new: failed to create temp dir: {e}")),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Unit store over this directory with a short lock timeout and no fsync.
    pub fn store(&self) -> FsUnitStore {
        FsUnitStore::new(self.path()).with_robustness(RobustnessConfig {
            lock_timeout: Duration::from_secs(2),
            enable_fsync: false,
        })
    }

    /// Drop a unit file in place without going through the store.
    pub fn write_unit(&self, id: &ServiceId, content: &str) {
        let path = self.path().join(id.as_str());
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_unit: failed to write {}: {e}", path.display()));
    }

    /// Content of the unit file for `id`.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_unit(&self, id: &ServiceId) -> String {
        let path = self.path().join(id.as_str());
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("read_unit: could not read {}: {e}", path.display()))
    }

    /// Names of unit files present, sorted. Lock files are skipped.
    pub fn unit_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .unwrap_or_else(|e| panic!("unit_names: could not list unit dir: {e}"))
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".service") && !name.starts_with('.'))
            .collect();
        names.sort();
        names
    }

    /// Every entry in the directory, hidden files included, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .unwrap_or_else(|e| panic!("entries: could not list unit dir: {e}"))
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert nothing at all is left in the directory, lock files included.
    pub fn assert_empty(&self) {
        let entries = self.entries();
        assert!(entries.is_empty(), "Expected empty unit dir, found: {entries:?}");
    }

    pub fn assert_unit_exists(&self, id: &ServiceId) {
        let path = self.path().join(id.as_str());
        assert!(path.is_file(), "Expected unit file to exist: {}", path.display());
    }

    pub fn assert_unit_not_exists(&self, id: &ServiceId) {
        let path = self.path().join(id.as_str());
        assert!(
            !path.exists(),
            "Expected unit file NOT to exist: {}",
            path.display()
        );
    }
}
