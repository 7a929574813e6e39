//! Service identifiers for forward units
//!
//! Two naming schemes exist on deployed hosts:
//!
//! - **canonical**: `vortexl2-fwd-{tunnel}-{port}.service`, unique per
//!   tunnel and port so several tunnels can share one host
//! - **legacy**: `vortexl2-fwd-{port}.service`, unique per port only
//!
//! Legacy units are migrated away by [`crate::migration`].

use std::fmt;

/// Prefix shared by every forward unit
pub const UNIT_PREFIX: &str = "vortexl2-fwd-";

/// Suffix systemd expects on service units
pub const UNIT_SUFFIX: &str = ".service";

/// Fragment used when a tunnel name sanitizes to nothing
pub const FALLBACK_TUNNEL: &str = "tunnel";

/// Turn a free-form tunnel name into a fragment that is safe inside a unit name.
///
/// Lower-cases, keeps ASCII alphanumerics plus `-` and `_`, maps everything
/// else to `-`, collapses dash runs and trims dashes at both ends. Never
/// returns an empty string.
///
/// ```
/// use vortex_forward::naming::sanitize;
///
/// assert_eq!(sanitize("Edge Tunnel #1"), "edge-tunnel-1");
/// assert_eq!(sanitize("***"), "tunnel");
/// ```
pub fn sanitize(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut last_was_dash = true; // swallows leading dashes

    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        FALLBACK_TUNNEL.to_string()
    } else {
        result
    }
}

/// Name of a systemd unit that runs one forward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(String);

impl ServiceId {
    /// Collision-safe identifier for `port` on the tunnel called `tunnel_name`.
    pub fn canonical(tunnel_name: &str, port: u16) -> Self {
        Self(format!(
            "{}{}-{}{}",
            UNIT_PREFIX,
            sanitize(tunnel_name),
            port,
            UNIT_SUFFIX
        ))
    }

    /// Pre multi-tunnel identifier, keyed by port alone.
    pub fn legacy(port: u16) -> Self {
        Self(format!("{}{}{}", UNIT_PREFIX, port, UNIT_SUFFIX))
    }

    /// Split a canonical identifier back into its tunnel fragment and port.
    ///
    /// The port never contains `-`, so the last dash is always the boundary.
    /// Returns `None` for legacy identifiers and foreign unit names.
    pub fn split_canonical(&self) -> Option<(&str, u16)> {
        let stem = self
            .0
            .strip_prefix(UNIT_PREFIX)?
            .strip_suffix(UNIT_SUFFIX)?;
        let (tunnel, port) = stem.rsplit_once('-')?;
        if tunnel.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((tunnel, port.parse().ok()?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
