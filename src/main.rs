//! orchestrator - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the task intake API.

use orchestrator::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: redis={}:{}",
        config.redis_host, config.redis_port
    );

    // Start HTTP server. The Redis connection is established lazily, so the
    // process comes up (and serves /health) even while Redis is down.
    api::serve(config).await?;

    Ok(())
}
