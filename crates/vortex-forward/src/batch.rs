//! Batch operations
//!
//! Batches never stop early. Each port is handled on its own and its result
//! becomes one line of the transcript; the batch itself always succeeds.

use serde::Serialize;

use crate::controller::ServiceController;
use crate::engine::ForwardEngine;
use crate::error::{ForwardError, Result};
use crate::state::DeclaredState;
use crate::store::UnitStore;

/// Transcript returned when nothing is declared
pub const NO_FORWARDS_MESSAGE: &str = "No port forwards configured";

/// Parse one port token.
///
/// ```
/// use vortex_forward::batch::parse_port;
///
/// assert_eq!(parse_port(" 8080 ").unwrap(), 8080);
/// assert!(parse_port("0").is_err());
/// assert!(parse_port("http").is_err());
/// ```
pub fn parse_port(token: &str) -> Result<u16> {
    let token = token.trim();
    match token.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ForwardError::InvalidPort {
            token: token.to_string(),
        }),
    }
}

/// Split a comma separated port list into trimmed, non-empty tokens.
pub fn port_tokens(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Outcome of a batch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Always `true`; per-port failures only show up in `lines`
    pub success: bool,
    pub lines: Vec<String>,
}

impl BatchReport {
    fn new(lines: Vec<String>) -> Self {
        Self {
            success: true,
            lines,
        }
    }

    /// Newline-joined per-port messages.
    pub fn transcript(&self) -> String {
        self.lines.join("\n")
    }
}

fn port_line(port: u16, result: Result<String>) -> String {
    match result {
        Ok(message) => format!("Port {}: {}", port, message),
        Err(err) => format!("Port {}: {}", port, err),
    }
}

impl<S, C, U> ForwardEngine<S, C, U>
where
    S: DeclaredState,
    C: ServiceController,
    U: UnitStore,
{
    /// Create a forward for every port in a comma separated list.
    pub fn create_many(&mut self, ports: &str) -> BatchReport {
        self.for_each_token(ports, Self::create)
    }

    /// Remove the forward for every port in a comma separated list.
    pub fn remove_many(&mut self, ports: &str) -> BatchReport {
        self.for_each_token(ports, Self::remove)
    }

    /// Start every declared forward.
    pub fn start_all(&mut self) -> BatchReport {
        self.for_each_declared(Self::start)
    }

    /// Stop every declared forward.
    pub fn stop_all(&mut self) -> BatchReport {
        self.for_each_declared(|engine, port| engine.stop(port))
    }

    /// Restart every declared forward with the current tunnel settings.
    pub fn restart_all(&mut self) -> BatchReport {
        self.for_each_declared(Self::restart)
    }

    fn for_each_token<F>(&mut self, ports: &str, mut op: F) -> BatchReport
    where
        F: FnMut(&mut Self, u16) -> Result<String>,
    {
        let mut lines = Vec::new();
        for token in port_tokens(ports) {
            let line = match parse_port(token) {
                Ok(port) => port_line(port, op(&mut *self, port)),
                Err(err) => {
                    tracing::warn!(token, "Skipping invalid port token");
                    format!("Port '{}': {}", token, err)
                }
            };
            lines.push(line);
        }
        BatchReport::new(lines)
    }

    fn for_each_declared<F>(&mut self, mut op: F) -> BatchReport
    where
        F: FnMut(&mut Self, u16) -> Result<String>,
    {
        // Snapshot first: ops may add or drop ports while we iterate.
        let mut ports = self.state().forwarded_ports();
        ports.sort_unstable();
        ports.dedup();

        if ports.is_empty() {
            return BatchReport::new(vec![NO_FORWARDS_MESSAGE.to_string()]);
        }

        let mut lines = Vec::with_capacity(ports.len());
        for port in ports {
            lines.push(port_line(port, op(&mut *self, port)));
        }
        BatchReport::new(lines)
    }
}
