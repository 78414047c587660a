//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::task::{Subtask, Task, TaskStatus, DEFAULT_PRIORITY};

/// Request to submit a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    /// Free-text description of the work
    pub description: String,

    /// Advisory priority, default 1. Stored on the record and copied into
    /// each work item, but it does not affect dispatch order.
    #[serde(default = "default_priority")]
    pub priority: i64,
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

/// A task together with its derived subtasks, in decomposition order.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub description: String,
    pub priority: i64,
    pub status: TaskStatus,
    pub created_at: String,
    pub subtasks: Vec<Subtask>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.task_id().to_string(),
            description: task.description().to_string(),
            priority: task.priority(),
            status: task.status(),
            created_at: task.created_at().to_string(),
            subtasks: task.subtasks(),
        }
    }
}

/// Health report. Returned with 200 regardless of backend state.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub redis: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_when_omitted() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"description": "Paint the shed"}"#).unwrap();
        assert_eq!(req.priority, 1);

        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"description": "Paint the shed", "priority": 5}"#).unwrap();
        assert_eq!(req.priority, 5);
    }

    #[test]
    fn missing_description_fails_deserialization() {
        assert!(serde_json::from_str::<CreateTaskRequest>(r#"{"priority": 2}"#).is_err());
    }

    #[test]
    fn response_carries_subtasks_in_order() {
        let task = Task::new(
            "Build a REST API for inventory".to_string(),
            2,
            vec!["a".to_string(), "b".to_string()],
        );
        let response = TaskResponse::from(&task);
        assert_eq!(response.task_id, task.task_id().to_string());
        assert_eq!(response.subtasks.len(), 2);
        assert_eq!(
            response.subtasks[0].subtask_id,
            format!("{}-0", task.task_id())
        );

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["status"], "queued");
    }
}
