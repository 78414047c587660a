//! Task service: create, look up, and report backend health.

use std::sync::Arc;

use tracing::{debug, info};

use super::task::{record_key, Task};
use crate::backend::Backend;
use crate::decompose::decompose;
use crate::error::ServiceError;

/// Name of the shared work queue.
///
/// Work items are `LPUSH`ed here; workers `BRPOP` from the opposite end, so
/// the queue is FIFO from producer to consumer.
pub const WORK_QUEUE: &str = "work_queue";

/// Reported backend connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendHealth {
    Connected,
    Disconnected,
}

/// Owns the task lifecycle: creates the record, invokes the decomposer,
/// persists, enqueues, and answers lookups.
///
/// Stateless per request; the injected backend handle is the only shared
/// resource and is itself safe for concurrent use, so any number of
/// create/get calls may run in parallel.
#[derive(Clone)]
pub struct TaskService {
    backend: Arc<dyn Backend>,
}

impl TaskService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Create a task: decompose the description, persist the record, then
    /// queue one work item per subtask in order.
    ///
    /// The record write goes first. The stored task is the source of truth
    /// for subtasks and the queue is only a work-distribution channel, so a
    /// lookup is correct even while pushes are still in flight. If a push
    /// fails partway the caller sees `BackendUnavailable`; the record
    /// already written still answers lookups, and enqueue is at-least-once
    /// from the worker's perspective if the caller retries.
    pub async fn create(&self, description: &str, priority: i64) -> Result<Task, ServiceError> {
        if description.trim().is_empty() {
            return Err(ServiceError::Validation(
                "description must not be empty".to_string(),
            ));
        }

        let subtasks = decompose(description);
        debug!("Decomposed task into {} subtasks", subtasks.len());

        let task = Task::new(description.to_string(), priority, subtasks);
        self.backend
            .put_record(&task.record_key(), &task.storage_fields())
            .await?;

        for item in task.work_items() {
            self.backend.push_work(WORK_QUEUE, &item.payload()).await?;
        }

        info!(
            "Created task {} with {} subtasks",
            task.task_id(),
            task.subtask_descriptions().len()
        );
        Ok(task)
    }

    /// Look up a task by id, reconstructing subtask views from the stored
    /// record. Repeated calls with no intervening writes return identical
    /// results.
    pub async fn get(&self, task_id: &str) -> Result<Task, ServiceError> {
        let fields = self.backend.get_record(&record_key(task_id)).await?;
        if fields.is_empty() {
            return Err(ServiceError::NotFound(task_id.to_string()));
        }
        Ok(Task::from_fields(task_id, &fields))
    }

    /// Probe backend connectivity. Never fails; an unreachable backend is a
    /// reportable state, not an error.
    pub async fn health(&self) -> BackendHealth {
        match self.backend.ping().await {
            Ok(()) => BackendHealth::Connected,
            Err(_) => BackendHealth::Disconnected,
        }
    }
}
