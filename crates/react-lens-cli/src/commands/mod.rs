//! CLI command implementations

pub mod explain;
pub mod fix;
pub mod scan;
pub mod status;

pub use explain::ExplainArgs;
pub use fix::FixArgs;
pub use scan::ScanArgs;
pub use status::StatusArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a file or directory and print a health report
    Scan(ScanArgs),

    /// Send a free-form prompt to the AI remediation service
    Fix(FixArgs),

    /// Show detailed explanation for a specific rule
    Explain(ExplainArgs),

    /// Show whether AI suggestions are available
    Status(StatusArgs),
}

/// Disables colors for `--no-color` or a set `NO_COLOR`.
pub(crate) fn configure_colors(no_color: bool) {
    if no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }
}
