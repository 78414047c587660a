//! # Orchestrator
//!
//! Task intake service: accepts a free-text task description, decomposes it
//! into an ordered list of subtasks, persists the task record, and queues one
//! work item per subtask on Redis for downstream workers.
//!
//! ## Task Flow
//! 1. Receive a task via `POST /tasks`
//! 2. The decomposer splits the description into subtasks
//! 3. The task record is written to the store, then one work item per
//!    subtask is pushed onto the shared work queue
//! 4. Workers pop work items and execute them independently
//!
//! The task record is the source of truth: subtask identity is derived from
//! the task id and the stored order, never persisted on its own, and lookups
//! reconstruct it without touching the queue.
//!
//! ## Modules
//! - `api`: HTTP surface (task submission, lookup, health)
//! - `task`: task records, derived subtask views, and the task service
//! - `decompose`: rule-based task decomposition
//! - `backend`: record store / work queue abstraction with Redis and
//!   in-memory implementations
//! - `worker`: queue consumer used by the worker binary

pub mod api;
pub mod backend;
pub mod config;
pub mod decompose;
pub mod error;
pub mod task;
pub mod worker;

pub use config::Config;
pub use error::ServiceError;
