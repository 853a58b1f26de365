//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dca")]
#[command(author, version, about = "Dollar-cost-averaging simulator for crypto price history")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a DCA simulation
    Simulate(SimulateArgs),
    /// Inspect or clear the price cache
    Cache(CacheArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Asset pairs to simulate (comma-separated, e.g. BTC-USD,ETH-USD)
    #[arg(short, long, value_delimiter = ',')]
    pub pairs: Vec<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// End date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end: Option<String>,

    /// Amount invested per purchase
    #[arg(short, long)]
    pub amount: Option<f64>,

    /// Purchase frequency (daily, weekly, biweekly, monthly)
    #[arg(short, long)]
    pub frequency: Option<String>,

    /// Offline price data file (CSV with date,price columns)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save results to file (JSON)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Show cache usage statistics
    Stats,
    /// Remove expired entries
    ClearExpired,
    /// Remove every cached entry
    Clear,
}
