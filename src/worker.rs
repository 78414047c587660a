//! Work queue consumer.
//!
//! Pops work items from the shared queue, simulates execution, and writes a
//! completion record per subtask. The orchestrator core never reads these
//! records back; they exist for operators and downstream tooling. Delivery
//! is at-most-once per item: a popped payload that fails to parse is logged
//! and skipped, never requeued.

use std::time::Duration;

use ::redis::aio::MultiplexedConnection;
use ::redis::AsyncCommands;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::task::{WorkItem, WORK_QUEUE};

/// How long each completion record is retained.
const RESULT_TTL_SECS: u64 = 24 * 60 * 60;

/// Seconds a single `BRPOP` blocks before the loop polls again.
const POP_BLOCK_SECS: f64 = 1.0;

/// Completion record written after executing a work item.
#[derive(Debug, Clone, Serialize)]
pub struct WorkResult {
    pub subtask_id: String,
    pub task_id: String,
    pub status: String,
    pub worker_id: String,
    pub completed_at: String,
    pub description: String,
}

/// Storage key for a subtask's completion record.
pub fn result_key(subtask_id: &str) -> String {
    format!("result:{}", subtask_id)
}

/// Parse a queue payload, logging and discarding anything malformed.
pub fn parse_work_item(payload: &str) -> Option<WorkItem> {
    match serde_json::from_str(payload) {
        Ok(item) => Some(item),
        Err(e) => {
            error!("Failed to parse work item: {}", e);
            None
        }
    }
}

/// Queue consumer bound to one Redis connection.
pub struct Worker {
    id: String,
    conn: MultiplexedConnection,
}

impl Worker {
    pub fn new(id: String, conn: MultiplexedConnection) -> Self {
        Self { id, conn }
    }

    /// Consume the queue until the future is dropped.
    pub async fn run(&self) {
        info!("Worker {} started processing jobs", self.id);

        loop {
            match self.next_item().await {
                Ok(Some(item)) => self.execute(item).await,
                // Poll timeout with an empty queue, or an unparseable payload.
                Ok(None) => {}
                Err(e) => {
                    warn!("Error fetching work item: {}", e);
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    }

    /// Block briefly on the queue tail and parse whatever arrives.
    async fn next_item(&self) -> Result<Option<WorkItem>, ::redis::RedisError> {
        let mut conn = self.conn.clone();
        let popped: Option<(String, String)> = conn.brpop(WORK_QUEUE, POP_BLOCK_SECS).await?;
        let Some((_, payload)) = popped else {
            return Ok(None);
        };
        Ok(parse_work_item(&payload))
    }

    /// Simulated execution: sleep scaled by priority, then store the result.
    async fn execute(&self, item: WorkItem) {
        info!(
            "[{}] Processing: {} (task {})",
            self.id, item.description, item.task_id
        );

        let work_duration = Duration::from_secs(1 + item.priority.max(0) as u64);
        tokio::time::sleep(work_duration).await;

        let result = WorkResult {
            subtask_id: item.subtask_id.clone(),
            task_id: item.task_id,
            status: "completed".to_string(),
            worker_id: self.id.clone(),
            completed_at: Utc::now().to_rfc3339(),
            description: item.description.clone(),
        };

        let payload = match serde_json::to_string(&result) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize result: {}", e);
                return;
            }
        };

        let mut conn = self.conn.clone();
        let stored: Result<(), _> = conn
            .set_ex(result_key(&item.subtask_id), payload, RESULT_TTL_SECS)
            .await;
        if let Err(e) = stored {
            error!("Failed to store result: {}", e);
            return;
        }

        info!("[{}] Completed: {}", self.id, item.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_orchestrator_payloads() {
        let item = WorkItem {
            task_id: "abc".to_string(),
            subtask_id: "abc-0".to_string(),
            description: "Design user database schema".to_string(),
            priority: 1,
        };
        assert_eq!(parse_work_item(&item.payload()), Some(item));
    }

    #[test]
    fn malformed_payloads_are_discarded() {
        assert_eq!(parse_work_item("not json"), None);
        assert_eq!(parse_work_item(r#"{"task_id": "only"}"#), None);
    }

    #[test]
    fn result_keys_are_scoped_by_subtask() {
        assert_eq!(result_key("abc-2"), "result:abc-2");
    }

    #[test]
    fn result_record_has_the_documented_shape() {
        let result = WorkResult {
            subtask_id: "abc-0".to_string(),
            task_id: "abc".to_string(),
            status: "completed".to_string(),
            worker_id: "worker-1".to_string(),
            completed_at: Utc::now().to_rfc3339(),
            description: "step".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        for field in [
            "subtask_id",
            "task_id",
            "status",
            "worker_id",
            "completed_at",
            "description",
        ] {
            assert!(value.get(field).is_some());
        }
        assert_eq!(value["status"], "completed");
    }
}
