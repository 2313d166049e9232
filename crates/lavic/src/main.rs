// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LaViC toolkit binary.
//!
//! Builds fighter asset packages from a model spreadsheet and controls
//! scenarios on the LaViC simulation platform, either directly or as an
//! MCP tool server over stdio.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod error;
mod mcp;
mod package;
mod sim;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lavic_config::LavicConfig;

use crate::error::CliError;

/// LaViC toolkit: fighter package builder and simulation control.
#[derive(Parser, Debug)]
#[command(name = "lavic", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the standard search locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build fighter packages from the model spreadsheet.
    Package {
        /// Spreadsheet to read (defaults to packager.sheet_path).
        #[arg(long)]
        sheet: Option<PathBuf>,
        /// Only build the package with this catalog key.
        #[arg(long)]
        only: Option<String>,
    },
    /// Serve simulation tools over MCP on stdio.
    Mcp,
    /// Call the simulation platform directly.
    Sim {
        #[command(subcommand)]
        command: sim::SimCommand,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate configuration, then print a summary.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> Option<LavicConfig> {
    let loaded = match path {
        Some(path) => lavic_config::load_and_validate_path(path),
        None => lavic_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            lavic_config::render_errors(&errors);
            None
        }
    }
}

/// Logs go to stderr; stdout carries command output or MCP frames.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lavic={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

async fn run(cli: Cli, config: LavicConfig) -> Result<(), CliError> {
    match cli.command {
        Commands::Package { sheet, only } => package::run_package(&config, sheet, only).await,
        Commands::Mcp => mcp::run_mcp(&config).await,
        Commands::Sim { command } => sim::run_sim(&config, command).await,
        Commands::Config {
            command: ConfigCommand::Check,
        } => {
            print_config_summary(&config);
            Ok(())
        }
    }
}

fn print_config_summary(config: &LavicConfig) {
    println!("lavic: configuration is valid");
    println!("  catalog entries:  {}", config.catalog.len());
    println!("  models dir:       {}", config.packager.models_dir);
    println!("  template:         {}", config.packager.template_path);
    println!(
        "  rodin api key:    {}",
        if config.rodin.api_key.is_some() { "set" } else { "missing" }
    );
    println!("  simulation api:   {}", config.simulation.base_url);
    if let Some(proxy) = &config.network.proxy {
        println!("  proxy:            {proxy}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(config) = load_config(cli.config.as_ref()) else {
        return ExitCode::FAILURE;
    };
    init_tracing(&config.log.level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lavic: {e}");
            ExitCode::FAILURE
        }
    }
}
