//! VortexL2 port forward CLI
//!
//! Manages the per-port socat relay units of one tunnel.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::ServiceAction;
use context::CliContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(config = %cli.config.display(), unit_dir = %cli.unit_dir.display(), "Starting");

    let ctx = CliContext::from_cli(&cli);
    execute_command(&ctx, cli.command)
}

fn execute_command(ctx: &CliContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init {
            name,
            remote,
            listen,
        } => commands::run_init(ctx, &name, remote.as_deref(), listen.as_deref()),
        Commands::Add { ports } => commands::run_add(ctx, &ports),
        Commands::Remove { ports } => commands::run_remove(ctx, &ports),
        Commands::List { json } => commands::run_list(ctx, json),
        Commands::Start { port } => commands::run_service(ctx, ServiceAction::Start, port),
        Commands::Stop { port } => commands::run_service(ctx, ServiceAction::Stop, port),
        Commands::Restart { port } => commands::run_service(ctx, ServiceAction::Restart, port),
        Commands::InstallTemplate => commands::run_install_template(ctx),
    }
}
