//! Reelscout CLI - Command-line interface
//!
//! Provides command-line access to movie search, discovery and trending searches.

mod commands;
mod render;

use std::path::PathBuf;

use clap::Parser;
use reelscout_core::ReelscoutConfig;
use reelscout_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "reelscout")]
#[command(about = "Find movies you'll enjoy without the hassle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Directory for the full debug log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    /// Use the built-in offline catalogue instead of the movie API
    #[arg(long, global = true)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_path = init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;
    tracing::debug!(path = %log_path.display(), "Writing full trace log");

    let config = ReelscoutConfig::from_env()?;
    if let Err(error) = commands::handle_command(cli.command, &config, cli.demo).await {
        tracing::error!(%error, "Command failed");
        eprintln!("{}", error.user_message());
        std::process::exit(1);
    }

    Ok(())
}
