//! masgo agent
//!
//! Periodically samples runtime statistics and submits each value to the
//! server as an individual update.

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use masgo_agent::{config, runner};
use masgo_core::error::Result;

#[derive(Parser)]
#[command(name = "masgo-agent", about = "Metric collection agent")]
struct Cli {
    /// YAML config file; built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => config::load_from_file(path)?,
        None => config::AgentConfig::default(),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::warn!(error = %e, "ctrl-c handler unavailable");
                // Hold the sender so the loops keep running.
                std::future::pending::<()>().await;
                let _ = shutdown_tx.send(true);
            }
        }
    });

    tracing::info!("masgo-agent starting");
    runner::run(&cfg.agent, shutdown_rx).await?;
    tracing::info!("masgo-agent stopped");
    Ok(())
}
