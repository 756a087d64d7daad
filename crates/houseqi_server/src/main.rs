//! Houseqi server binary.

use anyhow::{Context, Result};
use clap::Parser;
use houseqi::GameState;
use houseqi_server::{AppState, Cli, ServerConfig, StateActor, router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads environment fallbacks
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::try_from(Cli::parse())?;
    if let Err(e) = run(config).await {
        error!(error = ?e, "Server stopped");
        return Err(e);
    }
    Ok(())
}

/// Runs the HTTP server until binding or serving fails.
async fn run(config: ServerConfig) -> Result<()> {
    let (actor, _actor_task) =
        StateActor::spawn(GameState::new(*config.variant()), config.actor_config());
    let app = router(AppState::new(actor, *config.keep_alive()));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, variant = %config.variant(), "Server ready at http://{}/", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;
    Ok(())
}
