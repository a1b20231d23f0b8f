//! Binary entry point for sitewatch.
//!
//! Offline tooling around the notification deduplication library: replaying
//! recorded violation logs and inspecting the effective configuration.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::{cmd_config, cmd_replay};
use sitewatch::config::SitewatchConfig;
use sitewatch::observability::{self, LoggingConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Sitewatch - notification deduplication for site-monitoring alerts.
#[derive(Parser)]
#[command(name = "sitewatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "SITEWATCH_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines violation log and print each decision.
    Replay {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,

        /// Override the suppression window in seconds.
        #[arg(short, long)]
        window_secs: Option<u64>,
    },

    /// Manage configuration.
    Config {
        /// Show the effective configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(Some(&config.logging), cli.verbose);
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: SitewatchConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Replay { file, window_secs } => cmd_replay(&config, file, window_secs),
        Commands::Config { show } => cmd_config(&config, show),
    }
}

/// Loads configuration from an explicit path or the default location, then
/// applies environment overrides.
fn load_config(path: Option<&Path>) -> Result<SitewatchConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) if !path.as_os_str().is_empty() => SitewatchConfig::load_from_file(path)?,
        _ => SitewatchConfig::load_default(),
    }
    .with_env_overrides();

    config.validate()?;
    Ok(config)
}
