//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::backend::RedisBackend;
use crate::config::Config;
use crate::error::ServiceError;
use crate::task::{BackendHealth, TaskService};

use super::types::{CreateTaskRequest, HealthResponse, TaskResponse};

/// Shared application state.
pub struct AppState {
    pub service: TaskService,
}

/// Start the HTTP server.
///
/// The Redis backend is constructed without connecting, so the server binds
/// and serves `/health` even when Redis is unreachable at startup.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let backend = RedisBackend::new(&config.redis_url())?;
    let service = TaskService::new(Arc::new(backend));
    let state = Arc::new(AppState { service });

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the router. Split out from [`serve`] so tests can mount the same
/// routes on an in-memory backend.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/:task_id", get(get_task))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wait for SIGINT/SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Submit a task: decompose, persist, queue.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<TaskResponse>, ServiceError> {
    let task = state.service.create(&req.description, req.priority).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// Get a task and its subtasks by id.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResponse>, ServiceError> {
    let task = state.service.get(&task_id).await?;
    Ok(Json(TaskResponse::from(&task)))
}

/// Health check endpoint. Always 200; backend connectivity is reported in
/// the body, never as a failure.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let redis = match state.service.health().await {
        BackendHealth::Connected => "connected",
        BackendHealth::Disconnected => "disconnected",
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "orchestrator".to_string(),
        redis: redis.to_string(),
    })
}
