//! HTTP API for the orchestrator.
//!
//! ## Endpoints
//!
//! - `POST /tasks` - Submit a task; it is decomposed, persisted, and queued
//! - `GET /tasks/{task_id}` - Get a task and its ordered subtasks
//! - `GET /health` - Health check with backend connectivity

pub mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
