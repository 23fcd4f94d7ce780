// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Procura CLI
//!
//! The `procura` binary operates a tender service deployment.
//!
//! ## Commands
//!
//! - `procura migrate` - Apply pending database migrations
//! - `procura config show|validate|generate` - Configuration management
//! - `procura ping` - Check database connectivity

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use procura_core::infrastructure::db::Database;

mod config;

use config::AppConfig;

/// Procura tender service - versioned tenders, bids and quorum decisions
#[derive(Parser)]
#[command(name = "procura")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "PROCURA_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PROCURA_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    #[command(name = "migrate")]
    Migrate,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Check database connectivity
    #[command(name = "ping")]
    Ping,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Migrate => migrate(cli.config).await,
        Commands::Config { command } => handle_config(command, cli.config).await,
        Commands::Ping => ping(cli.config).await,
    }
}

async fn migrate(config_override: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load_or_default(config_override)?;
    let db = Database::new(&config.postgres.url, config.postgres.max_connections)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.migrate().await.context("Failed to apply migrations")?;
    info!("migrations applied");
    println!("{}", "Migrations applied.".green());
    Ok(())
}

async fn handle_config(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = AppConfig::load_or_default(config_override)?;
            print!("{}", config.to_yaml()?);
            Ok(())
        }
        ConfigCommand::Validate { file } => {
            let config = AppConfig::load_or_default(file.or(config_override))?;
            println!(
                "{} postgres: {}",
                "Configuration is valid.".green(),
                config.postgres.url
            );
            Ok(())
        }
        ConfigCommand::Generate { output } => {
            if output.exists() {
                anyhow::bail!("{} already exists, not overwriting", output.display());
            }
            std::fs::write(&output, AppConfig::default().to_yaml()?)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{} {}", "Wrote".green(), output.display());
            Ok(())
        }
    }
}

async fn ping(config_override: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load_or_default(config_override)?;
    let db = Database::new(&config.postgres.url, config.postgres.max_connections)
        .await
        .context("Failed to connect to PostgreSQL")?;
    sqlx::query("SELECT 1").execute(db.get_pool()).await?;
    println!("{}", "Database is reachable.".green());
    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}
