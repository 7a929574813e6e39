//! Service controller abstraction
//!
//! The engine never talks to systemd directly. It drives a
//! [`ServiceController`], which in production is [`SystemctlController`]
//! and in tests an in-memory fake.

mod systemctl;

pub use systemctl::{DEFAULT_TIMEOUT, SystemctlController, run_command};

use crate::naming::ServiceId;

/// Result of one controller call.
///
/// `success` follows the exit status. `output` is trimmed stdout, or trimmed
/// stderr when stdout is empty. Timeouts and spawn failures are failed
/// outcomes carrying the cause as output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub output: String,
}

impl CommandOutcome {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }

    /// `Some(output)` when the call succeeded.
    pub fn output_if_ok(&self) -> Option<&str> {
        self.success.then_some(self.output.as_str())
    }
}

/// Start/stop/enable primitives keyed by service identifier.
///
/// Every method blocks until the underlying call returns or times out and
/// never panics on controller failure.
pub trait ServiceController {
    /// Reload the unit catalog after unit files changed.
    fn reload(&self) -> CommandOutcome;

    /// Enable the unit at boot and start it now.
    fn enable_now(&self, id: &ServiceId) -> CommandOutcome;

    fn start(&self, id: &ServiceId) -> CommandOutcome;

    fn stop(&self, id: &ServiceId) -> CommandOutcome;

    fn restart(&self, id: &ServiceId) -> CommandOutcome;

    fn disable(&self, id: &ServiceId) -> CommandOutcome;

    /// Activation state token, e.g. `active` or `inactive`.
    fn is_active(&self, id: &ServiceId) -> CommandOutcome;

    /// Enablement token, e.g. `enabled` or `disabled`.
    fn is_enabled(&self, id: &ServiceId) -> CommandOutcome;
}

impl<C: ServiceController + ?Sized> ServiceController for &C {
    fn reload(&self) -> CommandOutcome {
        (**self).reload()
    }

    fn enable_now(&self, id: &ServiceId) -> CommandOutcome {
        (**self).enable_now(id)
    }

    fn start(&self, id: &ServiceId) -> CommandOutcome {
        (**self).start(id)
    }

    fn stop(&self, id: &ServiceId) -> CommandOutcome {
        (**self).stop(id)
    }

    fn restart(&self, id: &ServiceId) -> CommandOutcome {
        (**self).restart(id)
    }

    fn disable(&self, id: &ServiceId) -> CommandOutcome {
        (**self).disable(id)
    }

    fn is_active(&self, id: &ServiceId) -> CommandOutcome {
        (**self).is_active(id)
    }

    fn is_enabled(&self, id: &ServiceId) -> CommandOutcome {
        (**self).is_enabled(id)
    }
}
