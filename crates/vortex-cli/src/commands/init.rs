//! Init command implementation

use colored::Colorize;
use vortex_forward::TunnelConfig;

use crate::context::CliContext;
use crate::error::Result;

/// Run the init command
///
/// Creates the tunnel config, or updates the scalars of an existing one while
/// keeping its declared ports. Units are not touched; `restart` applies
/// changed settings to running forwards.
pub fn run_init(
    ctx: &CliContext,
    name: &str,
    remote: Option<&str>,
    listen: Option<&str>,
) -> Result<()> {
    let path = ctx.config_path();
    let existed = path.exists();

    let mut config = if existed {
        TunnelConfig::load(path)?
    } else {
        TunnelConfig::default()
    };

    config.name = name.to_string();
    if let Some(remote) = remote {
        config.remote_forward_ip = Some(remote.to_string());
    }
    if let Some(listen) = listen {
        config.listen_ip = listen.to_string();
    }

    config.save(path)?;
    tracing::info!(path = %path.display(), name, "Tunnel config written");

    let verb = if existed { "Updated" } else { "Created" };
    println!("{} {} {}", "+".green(), verb, path.display());
    println!(
        "  {}: {}  {}: {}  {}: {}",
        "name".dimmed(),
        config.name.cyan(),
        "remote".dimmed(),
        config.remote_forward_ip.as_deref().unwrap_or("-"),
        "listen".dimmed(),
        config.listen_ip
    );
    if config.remote_forward_ip.is_none() {
        println!(
            "{} no remote set; forwards cannot be created until {} is given",
            "warning:".yellow().bold(),
            "--remote".cyan()
        );
    }

    Ok(())
}
