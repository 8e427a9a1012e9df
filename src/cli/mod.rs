//! Command-line interface definitions.

pub mod run;
pub mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::infrastructure::config::Config;

/// Spot/futures spread monitor and subscription gateway.
#[derive(Parser, Debug)]
#[command(name = "spreadwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scheduler and gateway (default)
    Run(RunArgs),

    /// Compute opportunities once and print them as JSON
    Scan(ScanArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Override the gateway listen address
    #[arg(long)]
    pub bind: Option<String>,

    /// Override the store connection URL
    #[arg(long)]
    pub store_url: Option<String>,
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug, Default)]
pub struct ScanArgs {
    /// Only print opportunities above the spread threshold
    #[arg(long)]
    pub actionable: bool,
}

impl Cli {
    /// Load the configuration file and apply the global overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config)?;
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }
        Ok(config)
    }
}
