//! Declared forwarding state
//!
//! The engine only sees the narrow [`DeclaredState`] view. [`TunnelConfig`]
//! is the serde-backed implementation persisted as the tunnel config file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vortex_fs::ConfigStore;

use crate::naming::FALLBACK_TUNNEL;
use crate::unit::ForwardingRule;

/// Operator intent for one tunnel.
pub trait DeclaredState {
    /// Display name of the tunnel.
    fn name(&self) -> &str;

    /// Remote endpoint every forward relays to, if configured.
    fn remote_forward_ip(&self) -> Option<&str>;

    /// Local address the relays bind to.
    fn listen_ip(&self) -> &str;

    /// Ports the operator wants forwarded, ascending.
    fn forwarded_ports(&self) -> Vec<u16>;

    fn add_port(&mut self, port: u16);

    fn remove_port(&mut self, port: u16);

    /// Rule for `port` under the current tunnel settings.
    ///
    /// `None` when no remote endpoint is configured.
    fn rule(&self, port: u16) -> Option<ForwardingRule> {
        let remote = self.remote_forward_ip()?;
        Some(ForwardingRule::new(self.name(), port, self.listen_ip(), remote))
    }
}

fn default_name() -> String {
    FALLBACK_TUNNEL.to_string()
}

fn default_listen_ip() -> String {
    "0.0.0.0".to_string()
}

/// Tunnel configuration file contents.
///
/// ```
/// use vortex_forward::TunnelConfig;
///
/// let config: TunnelConfig = toml::from_str(r#"
/// name = "edge"
/// remote_forward_ip = "10.30.30.2"
/// forwarded_ports = [8080, 443, 8080]
/// "#).unwrap();
///
/// assert_eq!(config.listen_ip, "0.0.0.0");
/// assert_eq!(config.ports(), &[443, 8080]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_forward_ip: Option<String>,

    #[serde(default = "default_listen_ip")]
    pub listen_ip: String,

    #[serde(default, deserialize_with = "ports::deserialize")]
    forwarded_ports: Vec<u16>,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            remote_forward_ip: None,
            listen_ip: default_listen_ip(),
            forwarded_ports: Vec::new(),
        }
    }
}

impl TunnelConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote_forward_ip = Some(remote.into());
        self
    }

    pub fn with_listen_ip(mut self, listen_ip: impl Into<String>) -> Self {
        self.listen_ip = listen_ip.into();
        self
    }

    pub fn with_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        for port in ports {
            self.add_port(port);
        }
        self
    }

    /// Declared ports, ascending and without duplicates.
    pub fn ports(&self) -> &[u16] {
        &self.forwarded_ports
    }

    pub fn load(path: &Path) -> vortex_fs::Result<Self> {
        ConfigStore::new().load(path)
    }

    pub fn save(&self, path: &Path) -> vortex_fs::Result<()> {
        ConfigStore::new().save(path, self)
    }
}

impl DeclaredState for TunnelConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn remote_forward_ip(&self) -> Option<&str> {
        self.remote_forward_ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }

    fn listen_ip(&self) -> &str {
        &self.listen_ip
    }

    fn forwarded_ports(&self) -> Vec<u16> {
        self.forwarded_ports.clone()
    }

    fn add_port(&mut self, port: u16) {
        if let Err(idx) = self.forwarded_ports.binary_search(&port) {
            self.forwarded_ports.insert(idx, port);
        }
    }

    fn remove_port(&mut self, port: u16) {
        self.forwarded_ports.retain(|p| *p != port);
    }
}

impl<S: DeclaredState + ?Sized> DeclaredState for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn remote_forward_ip(&self) -> Option<&str> {
        (**self).remote_forward_ip()
    }

    fn listen_ip(&self) -> &str {
        (**self).listen_ip()
    }

    fn forwarded_ports(&self) -> Vec<u16> {
        (**self).forwarded_ports()
    }

    fn add_port(&mut self, port: u16) {
        (**self).add_port(port)
    }

    fn remove_port(&mut self, port: u16) {
        (**self).remove_port(port)
    }
}

mod ports {
    use serde::{Deserialize, Deserializer};

    /// Hand-edited configs may list ports unordered or twice.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u16>, D::Error> {
        let mut ports = Vec::<u16>::deserialize(deserializer)?;
        ports.sort_unstable();
        ports.dedup();
        Ok(ports)
    }
}
