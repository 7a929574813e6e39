//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vortex_fs::SystemPath;

/// VortexL2 port forwards - manage socat relay units for a tunnel
#[derive(Parser, Debug)]
#[command(name = "vortexl2-fwd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Tunnel config file
    #[arg(
        long,
        global = true,
        env = "VORTEXL2_CONFIG",
        default_value = SystemPath::TunnelConfig.as_str()
    )]
    pub config: PathBuf,

    /// Directory holding the forward unit files
    #[arg(
        long,
        global = true,
        env = "VORTEXL2_UNIT_DIR",
        default_value = SystemPath::SystemdUnitDir.as_str()
    )]
    pub unit_dir: PathBuf,

    /// Service controller executable
    #[arg(long, global = true, env = "VORTEXL2_SYSTEMCTL", default_value = "systemctl")]
    pub systemctl: String,

    /// Timeout in seconds for each controller call
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write or update the tunnel config
    ///
    /// Declared ports are kept when the config already exists.
    ///
    /// Examples:
    ///   vortexl2-fwd init --name edge --remote 10.30.30.2
    ///   vortexl2-fwd init --name edge --listen 127.0.0.1
    Init {
        /// Tunnel display name
        #[arg(long)]
        name: String,

        /// Remote endpoint the forwards relay to
        #[arg(long)]
        remote: Option<String>,

        /// Local address the relays bind to
        #[arg(long)]
        listen: Option<String>,
    },

    /// Create forwards for a comma separated port list
    ///
    /// Examples:
    ///   vortexl2-fwd add 443
    ///   vortexl2-fwd add "80, 443, 8080"
    Add {
        /// Ports, e.g. "80,443"
        ports: String,
    },

    /// Remove forwards for a comma separated port list
    Remove {
        /// Ports, e.g. "80,443"
        ports: String,
    },

    /// Show declared forwards with their live status
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Start one forward, or all declared forwards
    Start {
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },

    /// Stop one forward, or all declared forwards
    Stop {
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },

    /// Restart one forward, or all declared forwards, with current settings
    Restart {
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },

    /// Compatibility no-op for the old template unit
    InstallTemplate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from(["vortexl2-fwd", "add", "80,443"]);
        assert_eq!(
            cli.command,
            Commands::Add {
                ports: "80,443".to_string()
            }
        );
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.unit_dir, PathBuf::from("/etc/systemd/system"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "vortexl2-fwd",
            "list",
            "--json",
            "--unit-dir",
            "/tmp/units",
            "--systemctl",
            "/bin/true",
        ]);
        assert_eq!(cli.command, Commands::List { json: true });
        assert_eq!(cli.unit_dir, PathBuf::from("/tmp/units"));
        assert_eq!(cli.systemctl, "/bin/true");
    }

    #[test]
    fn test_start_without_port_means_all() {
        let cli = Cli::parse_from(["vortexl2-fwd", "start"]);
        assert_eq!(cli.command, Commands::Start { port: None });
    }

    #[test]
    fn test_port_zero_rejected() {
        assert!(Cli::try_parse_from(["vortexl2-fwd", "stop", "0"]).is_err());
    }
}
