//! Command implementations for vortex-cli

pub mod forward;
pub mod init;
pub mod list;
pub mod service;

pub use forward::{run_add, run_remove};
pub use init::run_init;
pub use list::run_list;
pub use service::{ServiceAction, run_install_template, run_service};

use colored::Colorize;
use vortex_forward::BatchReport;

/// Print a batch transcript, one line per port.
pub(crate) fn print_report(report: &BatchReport) {
    for line in &report.lines {
        println!("  {} {}", "-".dimmed(), line);
    }
}
