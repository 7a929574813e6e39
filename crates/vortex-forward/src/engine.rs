//! ForwardEngine implementation
//!
//! The engine reconciles the declared port set of one tunnel with the unit
//! files on disk and the units known to the service controller. Per port it
//! moves between three states:
//!
//! ```text
//!   Absent --create--> Running <--start/stop--> Stopped
//!     ^                   |                        |
//!     +------remove-------+-----------remove-------+
//! ```
//!
//! A legacy unit for the port is always migrated away before create, start
//! or restart touch the canonical unit.

use crate::controller::{CommandOutcome, ServiceController};
use crate::error::{ForwardError, Result};
use crate::migration::{self, MigrationOutcome};
use crate::naming::ServiceId;
use crate::state::DeclaredState;
use crate::store::UnitStore;

/// Message returned by [`ForwardEngine::install_template`]
pub const NO_TEMPLATE_MESSAGE: &str = "No template required (per-port units)";

/// Reconciles declared forwards with live service units.
///
/// Single-port operations return `Ok(message)` or an error whose `Display`
/// is the failure message. Declared state is only touched as the last step
/// of a successful `create`, or unconditionally at the end of `remove`.
pub struct ForwardEngine<S, C, U> {
    state: S,
    controller: C,
    units: U,
}

impl<S, C, U> ForwardEngine<S, C, U>
where
    S: DeclaredState,
    C: ServiceController,
    U: UnitStore,
{
    pub fn new(state: S, controller: C, units: U) -> Self {
        Self {
            state,
            controller,
            units,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn units(&self) -> &U {
        &self.units
    }

    /// Give back the declared state, e.g. to persist it.
    pub fn into_state(self) -> S {
        self.state
    }

    /// Canonical unit name for `port` on this tunnel.
    pub fn service_id(&self, port: u16) -> ServiceId {
        ServiceId::canonical(self.state.name(), port)
    }

    pub fn migrate_if_legacy(&self, port: u16) -> MigrationOutcome {
        migration::migrate_if_legacy(&self.controller, &self.units, port)
    }

    /// Provision and start the forward for `port`.
    ///
    /// Idempotent: an unchanged unit is left as is and `enable --now` on a
    /// running unit is a no-op. If enabling fails the written unit file stays
    /// behind; the next create rewrites and restarts it.
    pub fn create(&mut self, port: u16) -> Result<String> {
        let rule = self.state.rule(port).ok_or(ForwardError::MissingRemote)?;

        let _ = self.migrate_if_legacy(port);

        let id = rule.service_id();
        self.units
            .write(&id, &rule.render())
            .map_err(|source| ForwardError::UnitWrite { source })?;

        self.reload();

        let enabled = self.controller.enable_now(&id);
        if !enabled.success {
            tracing::warn!(port, unit = %id, output = %enabled.output, "Enabling forward failed");
            return Err(ForwardError::EnableFailed {
                port,
                output: enabled.output,
            });
        }

        self.state.add_port(port);
        tracing::info!(port, unit = %id, remote = %rule.remote_endpoint(), "Forward created");

        Ok(format!(
            "Port forward for {} created (listen {} -> {})",
            port,
            rule.listen_ip,
            rule.remote_endpoint()
        ))
    }

    /// Tear down every trace of the forward for `port`.
    ///
    /// Always succeeds: stop, disable and file deletion for both naming
    /// schemes are best-effort, and the port leaves declared state even if
    /// some cleanup step failed.
    pub fn remove(&mut self, port: u16) -> Result<String> {
        let canonical = self.service_id(port);
        let legacy = ServiceId::legacy(port);

        for id in [&canonical, &legacy] {
            best_effort("stop", id, self.controller.stop(id));
            best_effort("disable", id, self.controller.disable(id));
        }

        for id in [&canonical, &legacy] {
            match self.units.remove(id) {
                Ok(true) => tracing::debug!(unit = %id, "Deleted unit file"),
                Ok(false) => {}
                Err(e) => tracing::warn!(unit = %id, error = %e, "Could not delete unit file"),
            }
        }

        self.reload();

        self.state.remove_port(port);
        tracing::info!(port, "Forward removed");

        Ok(format!("Port forward for {} removed", port))
    }

    /// Start the forward for `port`, provisioning it if its unit is missing.
    pub fn start(&mut self, port: u16) -> Result<String> {
        let _ = self.migrate_if_legacy(port);

        let id = self.service_id(port);
        if !self.units.exists(&id) {
            return self.recreate(port);
        }

        let started = self.controller.start(&id);
        if started.success {
            tracing::info!(port, unit = %id, "Forward started");
            Ok("started".to_string())
        } else {
            Err(ForwardError::StartFailed {
                output: started.output,
            })
        }
    }

    /// Stop the forward for `port`.
    ///
    /// A legacy unit for the port is stopped too, if there is one; failure
    /// to stop it is not reported.
    pub fn stop(&self, port: u16) -> Result<String> {
        let id = self.service_id(port);
        let stopped = self.controller.stop(&id);

        let legacy = ServiceId::legacy(port);
        best_effort("stop", &legacy, self.controller.stop(&legacy));

        if stopped.success {
            tracing::info!(port, unit = %id, "Forward stopped");
            Ok(format!("stopped ({})", id))
        } else {
            Err(ForwardError::StopFailed {
                output: stopped.output,
            })
        }
    }

    /// Restart the forward for `port` with the current tunnel settings.
    ///
    /// The unit is re-rendered from the tunnel config as it is now, so a
    /// changed remote endpoint only reaches ports that get restarted.
    pub fn restart(&mut self, port: u16) -> Result<String> {
        let _ = self.migrate_if_legacy(port);

        let id = self.service_id(port);
        if !self.units.exists(&id) {
            return self.recreate(port);
        }

        let rule = self.state.rule(port).ok_or(ForwardError::MissingRemote)?;
        self.units
            .write(&id, &rule.render())
            .map_err(|source| ForwardError::UnitRewrite { source })?;

        self.reload();

        let restarted = self.controller.restart(&id);
        if restarted.success {
            tracing::info!(port, unit = %id, "Forward restarted");
            Ok("restarted".to_string())
        } else {
            Err(ForwardError::RestartFailed {
                output: restarted.output,
            })
        }
    }

    /// Kept for callers of the old template-unit workflow; per-port units
    /// need no template.
    pub fn install_template(&self) -> String {
        NO_TEMPLATE_MESSAGE.to_string()
    }

    fn recreate(&mut self, port: u16) -> Result<String> {
        tracing::info!(port, "Unit file missing, recreating forward");
        self.create(port)
            .map(|_| "recreated and started".to_string())
            .map_err(|e| ForwardError::Recreate(Box::new(e)))
    }

    fn reload(&self) {
        best_effort_reload(self.controller.reload());
    }
}

fn best_effort(action: &str, id: &ServiceId, outcome: CommandOutcome) {
    if !outcome.success {
        tracing::debug!(action, unit = %id, output = %outcome.output, "Ignoring cleanup failure");
    }
}

fn best_effort_reload(outcome: CommandOutcome) {
    if !outcome.success {
        tracing::warn!(output = %outcome.output, "Controller reload failed");
    }
}
