//! Observed status of declared forwards

use serde::Serialize;

use crate::controller::ServiceController;
use crate::engine::ForwardEngine;
use crate::naming::ServiceId;
use crate::state::DeclaredState;
use crate::store::UnitStore;

/// Shown in place of the remote endpoint when none is configured
pub const NO_REMOTE: &str = "-";

/// One row of [`ForwardEngine::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardStatus {
    pub port: u16,
    /// Activation token, `inactive` when the controller had no answer
    pub status: String,
    /// Enablement token, `disabled` when the controller had no answer
    pub enabled: String,
    /// `remote:port`, or `-` without a remote endpoint
    pub remote: String,
}

impl ForwardStatus {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

impl<S, C, U> ForwardEngine<S, C, U>
where
    S: DeclaredState,
    C: ServiceController,
    U: UnitStore,
{
    /// Report every declared port in ascending order.
    ///
    /// Read-only: nothing is migrated, written or started. A port whose
    /// canonical unit is unknown but whose legacy unit answers is reported
    /// with the legacy unit's state.
    pub fn list(&self) -> Vec<ForwardStatus> {
        let mut ports = self.state().forwarded_ports();
        ports.sort_unstable();
        ports.dedup();

        ports.into_iter().map(|port| self.probe(port)).collect()
    }

    fn probe(&self, port: u16) -> ForwardStatus {
        let canonical = self.service_id(port);
        let legacy = ServiceId::legacy(port);

        let (id, status) = match self.controller().is_active(&canonical).output_if_ok() {
            Some(status) => (canonical, status.to_string()),
            None => match self.controller().is_active(&legacy).output_if_ok() {
                Some(status) => (legacy, status.to_string()),
                None => (canonical, "inactive".to_string()),
            },
        };

        let enabled = self
            .controller()
            .is_enabled(&id)
            .output_if_ok()
            .map(str::to_string)
            .unwrap_or_else(|| "disabled".to_string());

        let remote = match self.state().remote_forward_ip() {
            Some(ip) => format!("{}:{}", ip, port),
            None => NO_REMOTE.to_string(),
        };

        ForwardStatus {
            port,
            status,
            enabled,
            remote,
        }
    }
}
