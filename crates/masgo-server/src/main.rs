//! masgo server
//!
//! Accepts `POST /update/{type}/{name}/{value}` and accumulates the values in
//! memory for the process lifetime.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use masgo_core::error::{MasgoError, Result};
use masgo_server::{app_state, config, router};

#[derive(Parser)]
#[command(name = "masgo-server", about = "Metric update server")]
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
        None => config::ServerConfig::default(),
    };
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, "masgo-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MasgoError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MasgoError::Internal(format!("server failed: {e}")))?;

    tracing::info!("masgo-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
