//! Start, stop and restart commands

use colored::Colorize;

use super::print_report;
use crate::context::{CliContext, Engine};
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    fn heading(self) -> &'static str {
        match self {
            Self::Start => "Starting port forwards",
            Self::Stop => "Stopping port forwards",
            Self::Restart => "Restarting port forwards",
        }
    }
}

/// Run start, stop or restart for one port or every declared port.
///
/// A failing single port is an error; batch failures are only reported.
pub fn run_service(ctx: &CliContext, action: ServiceAction, port: Option<u16>) -> Result<()> {
    match port {
        Some(port) => {
            let result = ctx.with_engine(|engine: &mut Engine| match action {
                ServiceAction::Start => engine.start(port),
                ServiceAction::Stop => engine.stop(port),
                ServiceAction::Restart => engine.restart(port),
            })?;
            let message = result.map_err(|source| CliError::Port { port, source })?;
            println!("{} Port {}: {}", "+".green(), port, message);
        }
        None => {
            let report = ctx.with_engine(|engine: &mut Engine| match action {
                ServiceAction::Start => engine.start_all(),
                ServiceAction::Stop => engine.stop_all(),
                ServiceAction::Restart => engine.restart_all(),
            })?;
            println!("{}", action.heading().bold());
            print_report(&report);
        }
    }
    Ok(())
}

/// Run the install-template command
pub fn run_install_template(ctx: &CliContext) -> Result<()> {
    let config = ctx.load_config()?;
    println!("{}", ctx.engine(config).install_template());
    Ok(())
}
