//! CLI definitions.

pub mod commands;
pub mod setup;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use screener_config::ProviderKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screener")]
#[command(author, version, about = "Daily KDJ/MACD stock screener")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen a list of symbols and print the Buy and Sell lists
    Scan(ScanArgs),
    /// Run the pipeline for one symbol and print its indicator table
    Inspect(InspectArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    AlphaVantage,
    Csv,
}

impl From<SourceKind> for ProviderKind {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::AlphaVantage => ProviderKind::AlphaVantage,
            SourceKind::Csv => ProviderKind::Csv,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where prices come from and which day to analyse.
#[derive(clap::Args)]
pub struct SourceArgs {
    /// Price source (overrides provider.kind)
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Directory of per-symbol CSV files
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Last trading day to analyse (YYYY-MM-DD, default: yesterday)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Symbols to screen (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// CSV file with a Symbol column
    #[arg(long, conflicts_with = "symbols")]
    pub symbols_file: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Pipelines in flight at once (overrides batch.concurrency)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the report as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Print every symbol's indicator table
    #[arg(long)]
    pub detail: bool,
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// Symbol to analyse
    pub symbol: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Rows to print, newest first (0 = all)
    #[arg(long, default_value = "20")]
    pub rows: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
