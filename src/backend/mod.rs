//! Record store and work queue abstraction.
//!
//! The orchestrator's only outbound dependency: a key-value store offering
//! hash-shaped records plus a list primitive used as a work queue.
//! [`RedisBackend`] is the production implementation; [`MemoryBackend`] is an
//! in-process fake for tests. The service receives the backend as an injected
//! `Arc<dyn Backend>` rather than a global, so the two are interchangeable.

pub mod memory;
pub mod redis;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub use self::redis::RedisBackend;
pub use memory::MemoryBackend;

/// Error from a backend operation.
///
/// By the time an error leaves this layer, every failure mode (refused
/// connection, timeout, protocol error) means the same thing to the service:
/// the store is unreachable. The client library's own error types stay
/// inside the adapter.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("{0}")]
    Unavailable(String),
}

/// Key-value record storage plus a durable work queue.
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// requests, and every operation must fail fast under a bounded timeout
/// rather than hang when the store is unreachable.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Upsert a hash-shaped record, overwriting existing fields on key
    /// collision.
    async fn put_record(&self, key: &str, fields: &[(&str, String)]) -> Result<(), BackendError>;

    /// Fetch a record's fields. An absent key yields an empty map, not an
    /// error.
    async fn get_record(&self, key: &str) -> Result<HashMap<String, String>, BackendError>;

    /// Append a payload to the head of the named queue. Consumers pop from
    /// the tail, so delivery order is FIFO from producer to consumer.
    async fn push_work(&self, queue: &str, payload: &str) -> Result<(), BackendError>;

    /// Connectivity probe for health reporting.
    async fn ping(&self) -> Result<(), BackendError>;
}
