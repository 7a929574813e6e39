//! Error types for vortex-forward
//!
//! The `Display` text of each variant is the message operators see in
//! command output and batch transcripts.

/// Result type for vortex-forward operations
pub type Result<T> = std::result::Result<T, ForwardError>;

/// Errors a single forward operation can report
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The tunnel has no remote endpoint to forward to
    #[error("Remote forward IP not configured")]
    MissingRemote,

    /// A batch token did not parse as a port
    #[error("Invalid port number")]
    InvalidPort { token: String },

    /// Writing a new unit file failed
    #[error("Failed to create service file: {source}")]
    UnitWrite {
        #[source]
        source: vortex_fs::Error,
    },

    /// Rewriting an existing unit file during restart failed
    #[error("failed to write service file - {source}")]
    UnitRewrite {
        #[source]
        source: vortex_fs::Error,
    },

    /// `enable --now` on a freshly written unit failed
    #[error("Failed to start forward for port {port}: {output}")]
    EnableFailed { port: u16, output: String },

    /// A missing unit had to be recreated and that failed
    #[error("failed to recreate - {0}")]
    Recreate(#[source] Box<ForwardError>),

    #[error("failed to start - {output}")]
    StartFailed { output: String },

    #[error("failed to stop - {output}")]
    StopFailed { output: String },

    #[error("failed - {output}")]
    RestartFailed { output: String },
}

impl ForwardError {
    /// Whether this is a configuration problem rather than a runtime failure.
    pub fn is_config(&self) -> bool {
        match self {
            Self::MissingRemote => true,
            Self::Recreate(inner) => inner.is_config(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_unit_write_includes_cause() {
        let err = ForwardError::UnitWrite {
            source: vortex_fs::Error::io(
                PathBuf::from("/etc/systemd/system/x.service"),
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ),
        };
        let display = err.to_string();
        assert!(display.starts_with("Failed to create service file: "));
        assert!(display.contains("/etc/systemd/system/x.service"));
    }

    #[test]
    fn test_recreate_wraps_inner_message() {
        let err = ForwardError::Recreate(Box::new(ForwardError::MissingRemote));
        assert_eq!(err.to_string(), "failed to recreate - Remote forward IP not configured");
        assert!(err.is_config());
    }
}
