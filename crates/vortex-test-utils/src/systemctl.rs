//! Stub `systemctl` executable for end-to-end CLI tests.
//!
//! The stub appends its arguments to a log file and answers like a host
//! where no forward unit is running: `is-active` prints `inactive`,
//! `is-enabled` prints `disabled`, everything else succeeds silently.

use std::fs;
use std::path::{Path, PathBuf};

/// A stub script plus the log it writes to.
pub struct StubSystemctl {
    program: PathBuf,
    log: PathBuf,
}

impl StubSystemctl {
    /// Write a stub into `dir`.
    ///
    /// # Panics
    /// Panics if the script cannot be written or made executable.
    pub fn install(dir: &Path) -> Self {
        Self::install_with(dir, "")
    }

    /// Write a stub into `dir` whose `verb` calls fail with `message` on stderr.
    pub fn install_failing(dir: &Path, verb: &str, message: &str) -> Self {
        let case = format!("  {verb}) echo '{message}' >&2; exit 1 ;;\n");
        Self::install_with(dir, &case)
    }

    fn install_with(dir: &Path, extra_case: &str) -> Self {
        let program = dir.join("systemctl");
        let log = dir.join("systemctl.log");

        let script = format!(
            "#!/bin/sh\n\
             echo \"$*\" >> '{log}'\n\
             case \"$1\" in\n\
             {extra_case}  \
             is-active) echo inactive; exit 3 ;;\n  \
             is-enabled) echo disabled; exit 1 ;;\n\
             esac\n\
             exit 0\n",
            log = log.display(),
        );
        fs::write(&program, script)
            .unwrap_or_else(|e| panic!("StubSystemctl: failed to write script: {e}"));
        make_executable(&program);

        Self { program, log }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Logged invocations, one argument string per call.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .unwrap_or_else(|e| panic!("StubSystemctl: failed to chmod script: {e}"));
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
