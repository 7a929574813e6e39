//! Command context
//!
//! Resolves the global flags into a tunnel config location, a unit store and
//! a controller, and hands commands a ready engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use vortex_forward::{ForwardEngine, FsUnitStore, SystemctlController, TunnelConfig};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Engine as wired for the real host
pub type Engine = ForwardEngine<TunnelConfig, SystemctlController, FsUnitStore>;

#[derive(Debug, Clone)]
pub struct CliContext {
    config_path: PathBuf,
    unit_dir: PathBuf,
    systemctl: String,
    timeout: Duration,
}

impl CliContext {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config_path: cli.config.clone(),
            unit_dir: cli.unit_dir.clone(),
            systemctl: cli.systemctl.clone(),
            timeout: Duration::from_secs(cli.timeout),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the tunnel config, which must already exist.
    pub fn load_config(&self) -> Result<TunnelConfig> {
        if !self.config_path.exists() {
            return Err(CliError::user(format!(
                "No tunnel config at {}. Run `vortexl2-fwd init --name <NAME>` first.",
                self.config_path.display()
            )));
        }
        Ok(TunnelConfig::load(&self.config_path)?)
    }

    pub fn engine(&self, config: TunnelConfig) -> Engine {
        let controller = SystemctlController::new()
            .with_program(self.systemctl.as_str())
            .with_timeout(self.timeout);
        ForwardEngine::new(config, controller, FsUnitStore::new(&self.unit_dir))
    }

    /// Run `op` against an engine over the stored config.
    ///
    /// The config is written back only if the declared port set changed.
    pub fn with_engine<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Engine) -> T,
    {
        let config = self.load_config()?;
        let before = config.ports().to_vec();

        let mut engine = self.engine(config);
        let output = op(&mut engine);

        let config = engine.into_state();
        if config.ports() != before.as_slice() {
            tracing::debug!(
                path = %self.config_path.display(),
                ports = ?config.ports(),
                "Saving tunnel config"
            );
            config.save(&self.config_path)?;
        }

        Ok(output)
    }
}
