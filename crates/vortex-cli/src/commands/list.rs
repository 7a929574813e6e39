//! List command implementation

use colored::Colorize;
use vortex_forward::ForwardStatus;

use crate::context::CliContext;
use crate::error::Result;

/// Run the list command
pub fn run_list(ctx: &CliContext, json: bool) -> Result<()> {
    let statuses = ctx.with_engine(|engine| engine.list())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!(
            "{} (use {} to add)",
            "No port forwards configured".dimmed(),
            "vortexl2-fwd add".cyan()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<7} {:<10} {:<10} {}", "PORT", "STATUS", "ENABLED", "REMOTE").bold()
    );
    for status in &statuses {
        println!("{}", format_row(status));
    }

    Ok(())
}

fn format_row(status: &ForwardStatus) -> String {
    let state = format!("{:<10}", status.status);
    let state = if status.is_active() {
        state.green()
    } else if status.status == "failed" {
        state.red()
    } else {
        state.yellow()
    };
    format!(
        "{:<7} {} {:<10} {}",
        status.port, state, status.enabled, status.remote
    )
}
