//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bandwatch")]
#[command(author, version, about = "Bollinger band crossing alerts with a durable dedup ledger")]
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
    /// Run one alert pass over the configured symbols
    Run(RunArgs),
    /// Scan recent bars for the last crossing per symbol (read-only)
    Backfill(BackfillArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Symbols to watch (comma-separated); overrides the config list
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Print payloads instead of posting to the webhook
    #[arg(long)]
    pub dry_run: bool,

    /// Alert when the latest close is outside the band without a strict
    /// crossing edge
    #[arg(long)]
    pub loose: bool,
}

#[derive(clap::Args)]
pub struct BackfillArgs {
    /// Symbols to scan (comma-separated); overrides the config list
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Number of recent defined-band bars to scan
    #[arg(long, default_value = "200")]
    pub lookback: usize,
}
