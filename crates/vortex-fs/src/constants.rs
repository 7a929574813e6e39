//! Well-known system locations.

use std::path::Path;

/// Default system paths used by the forward manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPath {
    /// Directory systemd loads administrator unit files from
    SystemdUnitDir,
    /// Tunnel configuration holding the declared forwards
    TunnelConfig,
}

impl SystemPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemdUnitDir => "/etc/systemd/system",
            Self::TunnelConfig => "/etc/vortexl2/tunnel.toml",
        }
    }
}

impl AsRef<Path> for SystemPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for SystemPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
