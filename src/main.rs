//! DCA simulator CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    setup_logging(log_level, cli.json_logs);

    // Execute command
    match cli.command {
        Commands::Simulate(args) => cli::commands::simulate::run(args, &cli.config).await,
        Commands::Cache(args) => cli::commands::cache::run(args, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
