//! Purse demo CLI
//!
//! Runs scripted user sessions against the in-memory demo backend so the
//! coordination layer can be watched at work: superseded responses being
//! dropped, duplicate page loads rejected, order polling and toasts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use purse_app::demo::DemoWalletApi;
use purse_app::{AppConfig, AppCore};
use purse_effects::TokioTimeHandler;

mod scenarios;

#[derive(Parser)]
#[command(name = "purse")]
#[command(about = "Purse - wallet client request coordination demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "purse.toml")]
    config: PathBuf,

    /// Simulated backend latency per call
    #[arg(long, global = true, default_value = "200")]
    latency_ms: u64,

    /// Print the final view state as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch networks faster than the backend answers
    RapidSwitch,

    /// Load bill pages, including a duplicate trigger and a mid-load refresh
    Paginate,

    /// Submit an order and poll until it materializes
    PollOrder {
        /// Order amount in minor units; non-positive amounts fail
        #[arg(long, default_value = "1000", allow_hyphen_values = true)]
        amount: i64,

        /// Cancel the poll after this many milliseconds
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },

    /// Fire overlapping toasts and watch which one survives
    Toasts,

    /// Create deposit addresses until the network limit is reached
    Addresses {
        /// Network to allocate on
        #[arg(long, default_value = "TRON")]
        network: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    tracing::debug!(?config, "configuration loaded");

    let api = Arc::new(DemoWalletApi::new(
        Arc::new(TokioTimeHandler::new()),
        cli.latency_ms,
    ));
    let app = AppCore::with_tokio(config, api)?;

    match cli.command {
        Commands::RapidSwitch => scenarios::rapid_switch(&app).await?,
        Commands::Paginate => scenarios::paginate(&app).await?,
        Commands::PollOrder {
            amount,
            cancel_after_ms,
        } => scenarios::poll_order(&app, amount, cancel_after_ms).await?,
        Commands::Toasts => scenarios::toasts(&app).await?,
        Commands::Addresses { network } => scenarios::addresses(&app, &network).await?,
    }

    if cli.json {
        println!("{}", scenarios::snapshot(&app)?);
    }
    Ok(())
}
