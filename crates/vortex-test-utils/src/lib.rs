//! Shared test utilities for the vortexl2 forward workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`controller`]: in-memory [`FakeController`] with call log and failure injection
//! - [`units`]: [`TestUnitDir`], a throwaway unit directory with assertions
//! - [`systemctl`]: stub `systemctl` script for driving the CLI binary

pub mod controller;
pub mod systemctl;
pub mod units;

pub use controller::{FakeController, UnitState};
pub use systemctl::StubSystemctl;
pub use units::TestUnitDir;
