//! `systemctl`-backed controller

use std::ffi::OsStr;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use super::{CommandOutcome, ServiceController};
use crate::naming::ServiceId;

/// Upper bound for any single controller call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long output is still collected after the child exits. A grandchild
/// holding the pipes open must not stretch the call past this.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Controller that shells out to `systemctl`.
#[derive(Debug, Clone)]
pub struct SystemctlController {
    program: String,
    timeout: Duration,
}

impl Default for SystemctlController {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemctlController {
    pub fn new() -> Self {
        Self {
            program: "systemctl".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different executable, e.g. a wrapper script.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn systemctl(&self, args: &[&str]) -> CommandOutcome {
        tracing::debug!(program = %self.program, ?args, "Running controller command");
        let outcome = run_command(&self.program, args, self.timeout);
        if !outcome.success {
            tracing::debug!(?args, output = %outcome.output, "Controller command failed");
        }
        outcome
    }
}

impl ServiceController for SystemctlController {
    fn reload(&self) -> CommandOutcome {
        self.systemctl(&["daemon-reload"])
    }

    fn enable_now(&self, id: &ServiceId) -> CommandOutcome {
        self.systemctl(&["enable", "--now", id.as_str()])
    }

    fn start(&self, id: &ServiceId) -> CommandOutcome {
        self.systemctl(&["start", id.as_str()])
    }

    fn stop(&self, id: &ServiceId) -> CommandOutcome {
        self.systemctl(&["stop", id.as_str()])
    }

    fn restart(&self, id: &ServiceId) -> CommandOutcome {
        self.systemctl(&["restart", id.as_str()])
    }

    fn disable(&self, id: &ServiceId) -> CommandOutcome {
        self.systemctl(&["disable", id.as_str()])
    }

    fn is_active(&self, id: &ServiceId) -> CommandOutcome {
        self.systemctl(&["is-active", id.as_str()])
    }

    fn is_enabled(&self, id: &ServiceId) -> CommandOutcome {
        self.systemctl(&["is-enabled", id.as_str()])
    }
}

/// Run `program` with `args`, bounded by `timeout`.
///
/// Spawn failures and timeouts come back as failed outcomes; a timed-out
/// child is killed and reaped before returning. Output still arriving
/// [`DRAIN_GRACE`] after the child exits is dropped.
pub fn run_command<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    timeout: Duration,
) -> CommandOutcome {
    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return CommandOutcome::failed(format!("failed to run {}: {}", program, e)),
    };

    // Drain pipes on their own threads so a chatty child cannot block on a full pipe.
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            return CommandOutcome::failed(format!(
                "{} timed out after {}s",
                program,
                timeout.as_secs_f32()
            ));
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return CommandOutcome::failed(format!("failed to wait for {}: {}", program, e));
        }
    };

    let deadline = Instant::now() + DRAIN_GRACE;
    let stdout = drain(stdout, deadline);
    let stderr = drain(stderr, deadline);
    let output = if stdout.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        stdout.trim().to_string()
    };

    CommandOutcome {
        success: status.success(),
        output,
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// Collect whatever the reader delivers until EOF or `deadline`.
fn drain(rx: Option<Receiver<Vec<u8>>>, deadline: Instant) -> String {
    let Some(rx) = rx else {
        return String::new();
    };
    let mut bytes = Vec::new();
    while let Ok(chunk) = rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
