//! Filesystem primitives for the VortexL2 port forward manager
//!
//! Atomic locked writes for unit files and tunnel configs, config loading
//! by file extension, and content checksums.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use constants::SystemPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
