//! worker - Queue Consumer Entry Point
//!
//! Connects to Redis and processes work items from the shared queue until
//! interrupted. Unlike the orchestrator, the worker is useless without the
//! queue, so a failed connection at startup is fatal.

use orchestrator::{config::Config, worker::Worker};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orchestrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let worker_id = std::env::var("WORKER_ID").unwrap_or_else(|_| "worker-1".to_string());

    let client = redis::Client::open(config.redis_url().as_str())?;
    let conn = client.get_multiplexed_async_connection().await?;
    info!(
        "Worker {} connected to Redis at {}:{}",
        worker_id, config.redis_host, config.redis_port
    );

    let worker = Worker::new(worker_id, conn);

    tokio::select! {
        _ = worker.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping worker");
        }
    }

    Ok(())
}
