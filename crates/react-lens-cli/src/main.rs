//! React Lens CLI - health reports for React codebases

mod commands;
mod logging;
mod output;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "react-lens",
    author,
    version,
    about = "React codebase health analyzer",
    long_about = "React Lens scans JSX/TSX sources for accessibility, best-practice and bundle\n\
                  issues, scores the codebase, and can ask Google Gemini for fix suggestions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "warn",
        help = "Set the log level"
    )]
    pub log_level: LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);

    match cli.command {
        Commands::Scan(args) => args.run(),
        Commands::Fix(args) => args.run(),
        Commands::Explain(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
