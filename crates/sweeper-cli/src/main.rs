use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sweeper_core::{AppConfig, SweepOptions};

mod commands;

#[derive(Parser)]
#[command(name = "sweeper")]
#[command(author, version, about = "Deletes old, low-engagement posts from your timeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/sweeper/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP trigger (default)
    Serve,
    /// Run one sweep now and print the result
    Sweep {
        /// Select posts but do not delete them
        #[arg(long)]
        dry_run: bool,
        /// Stop after this many pages (0 = no limit)
        #[arg(short, long, default_value_t = 0)]
        max_iterations: u32,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load(cli.config.as_deref())?);

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config_path = AppConfig::resolve_path(cli.config.as_deref());
    if config_path.exists() {
        tracing::debug!("Loaded config from {}", config_path.display());
    } else if cli.config.is_some() {
        tracing::warn!("Config file {} not found, using defaults", config_path.display());
    }

    match cli.command {
        Some(Commands::Serve) | None => commands::serve::run(config).await,
        Some(Commands::Sweep { dry_run, max_iterations }) => {
            let options = SweepOptions { dry_run, max_iterations };
            commands::sweep::run(config, options).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(cli.config.as_deref(), force),
        },
    }
}
