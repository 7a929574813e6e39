//! Reconciliation engine for VortexL2 port forwards
//!
//! Every forwarded port of a tunnel runs as its own socat relay unit. This
//! crate keeps those units in line with the tunnel's declared port set:
//!
//! - **Naming**: deterministic, collision-free unit names per tunnel and port
//! - **Migration**: retiring units created under the old port-only names
//! - **Engine**: idempotent create, remove, start, stop and restart per port
//! - **Batches**: the same operations over port lists, continuing past failures
//! - **Status**: live controller state merged with declared ports
//!
//! # Architecture
//!
//! ```text
//!                  vortex-cli
//!                      |
//!                vortex-forward
//!        +-------------+-------------+
//!        |             |             |
//!   DeclaredState  UnitStore  ServiceController
//!   (TunnelConfig) (vortex-fs)   (systemctl)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vortex_forward::{ForwardEngine, FsUnitStore, SystemctlController, TunnelConfig};
//!
//! let config = TunnelConfig::new("edge").with_remote("10.30.30.2");
//! let mut engine = ForwardEngine::new(config, SystemctlController::new(), FsUnitStore::system());
//!
//! let report = engine.create_many("443, 8080");
//! println!("{}", report.transcript());
//! ```

pub mod batch;
pub mod controller;
pub mod engine;
pub mod error;
pub mod migration;
pub mod naming;
pub mod state;
pub mod status;
pub mod store;
pub mod unit;

pub use batch::{BatchReport, NO_FORWARDS_MESSAGE, parse_port, port_tokens};
pub use controller::{CommandOutcome, DEFAULT_TIMEOUT, ServiceController, SystemctlController};
pub use engine::{ForwardEngine, NO_TEMPLATE_MESSAGE};
pub use error::{ForwardError, Result};
pub use migration::{MigrationOutcome, migrate_if_legacy};
pub use naming::{ServiceId, sanitize};
pub use state::{DeclaredState, TunnelConfig};
pub use status::{ForwardStatus, NO_REMOTE};
pub use store::{FsUnitStore, UnitStore, WriteOutcome};
pub use unit::ForwardingRule;
