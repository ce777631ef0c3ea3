//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use super::commands::Command;

/// Storefront command line configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront catalog, cart and orders", long_about = None)]
pub(crate) struct Config {
    /// Directory holding the persisted cart, orders, addresses and theme
    #[arg(
        short,
        long,
        env = "STOREFRONT_DATA_DIR",
        default_value = ".storefront",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Catalog fixture to load instead of the bundled one
    #[arg(short, long, env = "STOREFRONT_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log output format.
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Supported log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Human-readable single line output.
    Compact,

    /// Structured JSON output.
    Json,
}
