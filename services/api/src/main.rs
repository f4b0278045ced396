use anyhow::Context;
use interview_api::{
    build_router,
    config::Config,
    state::{AppState, spawn_reaper},
};
use interview_service::build_assessors;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load application configuration")?;

    // RUST_LOG may hold a full filter directive; fall back to the parsed level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.interview.log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let assessors = build_assessors(&config.interview)?;
    let state = AppState::new(
        assessors,
        config.interview.evaluation_timeout,
        config.session_ttl,
    );
    // Sweep a few times per TTL so idle sessions go soon after expiring.
    let reaper = spawn_reaper(
        state.clone(),
        (config.session_ttl / 4).max(Duration::from_secs(1)),
    );
    let app = build_router(state);

    info!("Starting interview API, listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    reaper.abort();
    Ok(())
}
