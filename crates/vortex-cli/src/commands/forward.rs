//! Add and remove commands

use colored::Colorize;

use super::print_report;
use crate::context::CliContext;
use crate::error::Result;

/// Run the add command
pub fn run_add(ctx: &CliContext, ports: &str) -> Result<()> {
    let report = ctx.with_engine(|engine| engine.create_many(ports))?;
    println!("{}", "Creating port forwards".bold());
    print_report(&report);
    Ok(())
}

/// Run the remove command
pub fn run_remove(ctx: &CliContext, ports: &str) -> Result<()> {
    let report = ctx.with_engine(|engine| engine.remove_many(ports))?;
    println!("{}", "Removing port forwards".bold());
    print_report(&report);
    Ok(())
}
