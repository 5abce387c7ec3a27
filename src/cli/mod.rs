//! CLI interface for speedometer
//!
//! Provides subcommands for:
//! - `replay`: Run a file of bars through the indicator
//! - `check`: Validate the configuration file
//! - `config`: Show the effective configuration

mod replay;

pub use replay::ReplayArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "speedometer")]
#[command(about = "Bar-rate speedometer with debounced threshold alerts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines bar file
    Replay(ReplayArgs),
    /// Validate the configuration file
    Check,
    /// Show the effective configuration
    Config,
}
