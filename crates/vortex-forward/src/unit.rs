//! Forwarding rules and the unit text that runs them

use serde::{Deserialize, Serialize};

use crate::naming::ServiceId;

/// One `(listen_ip, port) -> (remote_ip, port)` forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingRule {
    /// Display name of the owning tunnel (unsanitized)
    pub tunnel_name: String,
    /// Port bound locally and reused on the remote side
    pub port: u16,
    pub listen_ip: String,
    pub remote_ip: String,
}

impl ForwardingRule {
    pub fn new(
        tunnel_name: impl Into<String>,
        port: u16,
        listen_ip: impl Into<String>,
        remote_ip: impl Into<String>,
    ) -> Self {
        Self {
            tunnel_name: tunnel_name.into(),
            port,
            listen_ip: listen_ip.into(),
            remote_ip: remote_ip.into(),
        }
    }

    /// Canonical unit name for this rule.
    pub fn service_id(&self) -> ServiceId {
        ServiceId::canonical(&self.tunnel_name, self.port)
    }

    /// `remote_ip:port` as shown to operators.
    pub fn remote_endpoint(&self) -> String {
        format!("{}:{}", self.remote_ip, self.port)
    }

    /// Render the unit file for this rule.
    ///
    /// The layout must stay byte-identical to units already deployed by
    /// older releases; only the four parameters vary.
    pub fn render(&self) -> String {
        format!(
            "[Unit]\n\
             Description=VortexL2 Port Forward - {tunnel} - Port {port}\n\
             After=network.target\n\
             Requires=network.target\n\
             \n\
             [Service]\n\
             Type=simple\n\
             ExecStart=/usr/bin/socat TCP4-LISTEN:{port},bind={listen_ip},reuseaddr,fork TCP4:{remote_ip}:{port}\n\
             Restart=always\n\
             RestartSec=5\n\
             \n\
             [Install]\n\
             WantedBy=multi-user.target\n",
            tunnel = self.tunnel_name,
            port = self.port,
            listen_ip = self.listen_ip,
            remote_ip = self.remote_ip,
        )
    }
}
