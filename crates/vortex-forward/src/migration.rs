//! Legacy unit migration
//!
//! Hosts provisioned before multi-tunnel support carry units named by port
//! only. Two tunnels forwarding the same port would fight over that name, so
//! every create, start and restart first decommissions any legacy unit.

use crate::controller::ServiceController;
use crate::naming::ServiceId;
use crate::store::UnitStore;

/// What [`migrate_if_legacy`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "callers may ignore the outcome, but should do so explicitly"]
pub enum MigrationOutcome {
    /// No legacy unit file existed
    NotNeeded,
    /// A legacy unit was stopped, disabled and its file removal attempted
    Migrated,
}

/// Decommission the legacy unit for `port` if its file exists.
///
/// Stop, disable and file removal are all best-effort: the unit may already
/// be stopped, unknown to the controller, or its file gone. Failures are
/// logged and swallowed. The controller is reloaded afterwards so later calls
/// see a consistent catalog.
pub fn migrate_if_legacy<C, U>(controller: &C, units: &U, port: u16) -> MigrationOutcome
where
    C: ServiceController + ?Sized,
    U: UnitStore + ?Sized,
{
    let legacy = ServiceId::legacy(port);
    if !units.exists(&legacy) {
        return MigrationOutcome::NotNeeded;
    }

    tracing::info!(port, unit = %legacy, "Migrating legacy forward unit");

    let stop = controller.stop(&legacy);
    if !stop.success {
        tracing::warn!(unit = %legacy, output = %stop.output, "Legacy unit stop failed");
    }
    let disable = controller.disable(&legacy);
    if !disable.success {
        tracing::warn!(unit = %legacy, output = %disable.output, "Legacy unit disable failed");
    }
    if let Err(e) = units.remove(&legacy) {
        tracing::warn!(unit = %legacy, error = %e, "Could not delete legacy unit file");
    }

    let reload = controller.reload();
    if !reload.success {
        tracing::warn!(output = %reload.output, "Controller reload after migration failed");
    }

    MigrationOutcome::Migrated
}
