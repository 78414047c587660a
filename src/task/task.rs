//! Task record and derived subtask views.
//!
//! # Invariants
//! - `subtask_descriptions` order is preserved end-to-end: decomposition,
//!   storage, enqueue, and lookup reconstruction all see the same sequence.
//! - Subtask identity is `{task_id}-{index}`, a pure function of the task id
//!   and the zero-based position. It is never stored; reordering the stored
//!   sequence would change identities on read, so the sequence is immutable
//!   for the task's lifetime.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority assigned when the client does not supply one.
pub const DEFAULT_PRIORITY: i64 = 1;

/// Opaque unique identifier for a task.
///
/// Generated from a v4 UUID at creation time and treated as an opaque string
/// everywhere else, so lookups with arbitrary ids miss cleanly instead of
/// failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a task in its lifecycle.
///
/// This service only ever writes `Queued`. The later states belong to the
/// workers that advance a task after dequeue; they exist here so records
/// those workers have updated still round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Stored textual form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Parse the stored textual form. Unknown values yield `None`; readers
    /// fall back to `Queued`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(TaskStatus::Queued),
            "running" => Some(TaskStatus::Running),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }
}

/// One derived piece of a task, executed by an external worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Derived identity: `{task_id}-{index}`
    pub subtask_id: String,

    /// The corresponding entry in the task's subtask list
    pub description: String,
}

/// Queue payload for one subtask.
///
/// Self-contained: a worker can execute it without calling back into the
/// orchestrator. Owned by the queue once pushed; the orchestrator never
/// reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub task_id: String,
    pub subtask_id: String,
    pub description: String,
    pub priority: i64,
}

impl WorkItem {
    /// Serialized queue payload.
    pub fn payload(&self) -> String {
        serde_json::json!({
            "task_id": self.task_id,
            "subtask_id": self.subtask_id,
            "description": self.description,
            "priority": self.priority,
        })
        .to_string()
    }
}

/// A client-submitted unit of work, decomposed into subtasks.
///
/// Created once; no field mutates afterwards. Deletion and retention are the
/// external store's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    task_id: TaskId,
    description: String,
    priority: i64,
    status: TaskStatus,
    created_at: String,
    subtask_descriptions: Vec<String>,
}

/// Storage key for a task record.
pub(crate) fn record_key(task_id: &str) -> String {
    format!("task:{}", task_id)
}

impl Task {
    /// Construct a freshly created task in the `Queued` state.
    ///
    /// `created_at` is captured here as RFC 3339 UTC, which sorts
    /// lexicographically by creation time.
    pub fn new(description: String, priority: i64, subtask_descriptions: Vec<String>) -> Self {
        Self {
            task_id: TaskId::new(),
            description,
            priority,
            status: TaskStatus::Queued,
            created_at: Utc::now().to_rfc3339(),
            subtask_descriptions,
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn subtask_descriptions(&self) -> &[String] {
        &self.subtask_descriptions
    }

    /// Storage key for this task's record.
    pub fn record_key(&self) -> String {
        record_key(self.task_id.as_str())
    }

    /// Derived subtask views, in decomposition order.
    ///
    /// Identity is `{task_id}-{index}` over the stored order. Entries that
    /// come back empty from storage are dropped rather than surfaced as
    /// phantom subtasks with blank descriptions; the index keeps counting
    /// across dropped entries so surviving identities stay stable.
    pub fn subtasks(&self) -> Vec<Subtask> {
        self.subtask_descriptions
            .iter()
            .enumerate()
            .filter(|(_, description)| !description.is_empty())
            .map(|(index, description)| Subtask {
                subtask_id: format!("{}-{}", self.task_id, index),
                description: description.clone(),
            })
            .collect()
    }

    /// One queue payload per subtask, in order.
    pub fn work_items(&self) -> Vec<WorkItem> {
        self.subtasks()
            .into_iter()
            .map(|subtask| WorkItem {
                task_id: self.task_id.to_string(),
                subtask_id: subtask.subtask_id,
                description: subtask.description,
                priority: self.priority,
            })
            .collect()
    }

    /// Field map persisted to the backend record.
    ///
    /// `subtasks` is stored as a JSON array rather than a joined string, so
    /// descriptions may contain commas or any other delimiter without
    /// corrupting reconstruction.
    pub fn storage_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("task_id", self.task_id.to_string()),
            ("description", self.description.clone()),
            ("priority", self.priority.to_string()),
            ("status", self.status.as_str().to_string()),
            ("created_at", self.created_at.clone()),
            (
                "subtasks",
                serde_json::Value::from(self.subtask_descriptions.clone()).to_string(),
            ),
        ]
    }

    /// Rebuild a task from a stored field map.
    ///
    /// Tolerates storage-format quirks: missing scalars fall back to their
    /// creation defaults and a malformed `subtasks` field reads as an empty
    /// list. Blank subtask entries are filtered later, in
    /// [`Task::subtasks`].
    pub fn from_fields(task_id: &str, fields: &HashMap<String, String>) -> Self {
        let subtask_descriptions = fields
            .get("subtasks")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        Self {
            task_id: TaskId::from(
                fields
                    .get("task_id")
                    .map(String::as_str)
                    .unwrap_or(task_id),
            ),
            description: fields.get("description").cloned().unwrap_or_default(),
            priority: fields
                .get("priority")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PRIORITY),
            status: fields
                .get("status")
                .and_then(|s| TaskStatus::parse(s))
                .unwrap_or(TaskStatus::Queued),
            created_at: fields.get("created_at").cloned().unwrap_or_default(),
            subtask_descriptions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task::new(
            "Ship the widget".to_string(),
            2,
            vec!["step one".to_string(), "step two".to_string()],
        )
    }

    #[test]
    fn subtask_identity_is_task_id_plus_position() {
        let task = sample_task();
        let subtasks = task.subtasks();
        assert_eq!(subtasks.len(), 2);
        assert_eq!(subtasks[0].subtask_id, format!("{}-0", task.task_id()));
        assert_eq!(subtasks[1].subtask_id, format!("{}-1", task.task_id()));
        assert_eq!(subtasks[0].description, "step one");
    }

    #[test]
    fn blank_entries_are_dropped_without_renumbering() {
        let mut task = sample_task();
        task.subtask_descriptions = vec![
            "first".to_string(),
            String::new(),
            "third".to_string(),
        ];
        let subtasks = task.subtasks();
        assert_eq!(subtasks.len(), 2);
        assert_eq!(subtasks[0].subtask_id, format!("{}-0", task.task_id()));
        // The dropped entry still occupies position 1.
        assert_eq!(subtasks[1].subtask_id, format!("{}-2", task.task_id()));
    }

    #[test]
    fn storage_round_trip_preserves_every_field() {
        let task = sample_task();
        let fields: HashMap<String, String> = task
            .storage_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let restored = Task::from_fields(task.task_id().as_str(), &fields);
        assert_eq!(restored, task);
    }

    #[test]
    fn subtasks_with_commas_survive_storage() {
        let task = Task::new(
            "Deploy, monitor, rollback".to_string(),
            1,
            vec![
                "Research requirements for: Deploy, monitor, rollback".to_string(),
                "Implement core logic for: Deploy, monitor, rollback".to_string(),
            ],
        );
        let fields: HashMap<String, String> = task
            .storage_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let restored = Task::from_fields(task.task_id().as_str(), &fields);
        assert_eq!(
            restored.subtask_descriptions(),
            task.subtask_descriptions()
        );
    }

    #[test]
    fn malformed_subtasks_field_reads_as_empty() {
        let mut fields = HashMap::new();
        fields.insert("description".to_string(), "x".to_string());
        fields.insert("subtasks".to_string(), "not json".to_string());

        let task = Task::from_fields("some-id", &fields);
        assert!(task.subtasks().is_empty());
        assert_eq!(task.status(), TaskStatus::Queued);
        assert_eq!(task.priority(), DEFAULT_PRIORITY);
    }

    #[test]
    fn work_items_carry_everything_a_worker_needs() {
        let task = sample_task();
        let items = task.work_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].task_id, task.task_id().to_string());
        assert_eq!(items[0].subtask_id, format!("{}-0", task.task_id()));
        assert_eq!(items[0].description, "step one");
        assert_eq!(items[0].priority, 2);
    }

    #[test]
    fn work_item_payload_parses_back() {
        let item = WorkItem {
            task_id: "t".to_string(),
            subtask_id: "t-0".to_string(),
            description: "do the thing".to_string(),
            priority: 3,
        };
        let parsed: WorkItem = serde_json::from_str(&item.payload()).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn status_text_round_trips_and_unknown_is_none() {
        for status in [
            TaskStatus::Queued,
            TaskStatus::Running,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("archived"), None);
    }

    #[test]
    fn created_at_sorts_lexicographically() {
        let earlier = Task::new("a".to_string(), 1, vec!["s".to_string()]);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = Task::new("b".to_string(), 1, vec!["s".to_string()]);
        assert!(earlier.created_at() < later.created_at());
    }
}
