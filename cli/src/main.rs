//! Fork rules operator CLI
//!
//! Loads the fork configuration and checks blocks or transactions stored as JSON.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use commands::OutputFormat;
use fork_core::config::ForkConfig;
use fork_core::util::init_logging;

#[derive(Parser)]
#[command(name = "fork-cli")]
#[command(about = "Check blocks and transactions against the fork rules", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level or filter directive, overrides the configuration
    #[arg(short, long)]
    log_level: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective fork configuration
    Params,

    /// Write a default configuration file
    Init {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Show the replay-protection marker and the output script wallets attach
    Marker,

    /// Check a JSON transaction against the fork transaction rule
    CheckTx {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Check a JSON block against the fork block rules
    CheckBlock {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// The block is the first block of the fork chain (implies --fork-active)
        #[arg(long)]
        activation_block: bool,

        /// Fork rules are active at this height
        #[arg(long)]
        fork_active: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = ForkConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let log_file = config.logging.file.as_deref().map(std::path::Path::new);
    init_logging(level, log_file).map_err(anyhow::Error::msg)?;

    config
        .install_poison_pattern()
        .context("Failed to install replay-protection marker")?;
    debug!(marker = %config.replay.marker_hex, "Fork rules ready");

    let accepted = match cli.command {
        Commands::Params => {
            commands::params::show_params(&config, cli.format)?;
            true
        }
        Commands::Init { path } => {
            commands::params::init_config(&path)?;
            true
        }
        Commands::Marker => {
            commands::params::show_marker(cli.format)?;
            true
        }
        Commands::CheckTx { file } => commands::check::check_tx(&file, cli.format)?,
        Commands::CheckBlock {
            file,
            activation_block,
            fork_active,
        } => commands::check::check_block(
            &file,
            commands::check::BlockContext {
                activation_block,
                fork_active,
            },
            &config.params,
            cli.format,
        )?,
    };

    Ok(if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
