//! In-memory backend for tests.
//!
//! Implements the same [`Backend`] contract as the Redis adapter: hash
//! records in a map, queues as vectors with head insertion (the `LPUSH`
//! convention, so the oldest payload sits at the tail). An outage toggle
//! makes every operation fail the way a dead Redis would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Backend, BackendError};

/// In-process implementation of [`Backend`].
#[derive(Default)]
pub struct MemoryBackend {
    unavailable: AtomicBool,
    queue_unavailable: AtomicBool,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, HashMap<String, String>>,
    queues: HashMap<String, Vec<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated outage. While set, every operation returns
    /// `BackendError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fail only queue pushes, leaving record reads and writes up. Simulates
    /// the backend dying between a record write and its enqueues.
    pub fn set_queue_unavailable(&self, unavailable: bool) {
        self.queue_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of a queue, head first (most recent push at index 0).
    pub async fn queue(&self, name: &str) -> Vec<String> {
        self.inner
            .read()
            .await
            .queues
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Pop from the tail of a queue, the way a `BRPOP` consumer would.
    pub async fn pop_work(&self, name: &str) -> Option<String> {
        self.inner.write().await.queues.get_mut(name)?.pop()
    }

    /// Keys of all stored records.
    pub async fn record_keys(&self) -> Vec<String> {
        self.inner.read().await.records.keys().cloned().collect()
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn put_record(&self, key: &str, fields: &[(&str, String)]) -> Result<(), BackendError> {
        self.check()?;
        let mut inner = self.inner.write().await;
        let record = inner.records.entry(key.to_string()).or_default();
        for (field, value) in fields {
            record.insert((*field).to_string(), value.clone());
        }
        Ok(())
    }

    async fn get_record(&self, key: &str) -> Result<HashMap<String, String>, BackendError> {
        self.check()?;
        Ok(self
            .inner
            .read()
            .await
            .records
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn push_work(&self, queue: &str, payload: &str) -> Result<(), BackendError> {
        self.check()?;
        if self.queue_unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable(
                "simulated queue outage".to_string(),
            ));
        }
        self.inner
            .write()
            .await
            .queues
            .entry(queue.to_string())
            .or_default()
            .insert(0, payload.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_upsert_and_read_back() {
        let backend = MemoryBackend::new();
        backend
            .put_record("task:1", &[("status", "queued".to_string())])
            .await
            .unwrap();
        backend
            .put_record("task:1", &[("status", "running".to_string())])
            .await
            .unwrap();

        let record = backend.get_record("task:1").await.unwrap();
        assert_eq!(record.get("status").map(String::as_str), Some("running"));
    }

    #[tokio::test]
    async fn absent_record_reads_as_empty_map() {
        let backend = MemoryBackend::new();
        assert!(backend.get_record("task:missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queue_is_fifo_from_the_consumer_end() {
        let backend = MemoryBackend::new();
        backend.push_work("q", "first").await.unwrap();
        backend.push_work("q", "second").await.unwrap();

        assert_eq!(backend.pop_work("q").await.as_deref(), Some("first"));
        assert_eq!(backend.pop_work("q").await.as_deref(), Some("second"));
        assert_eq!(backend.pop_work("q").await, None);
    }

    #[tokio::test]
    async fn outage_toggle_fails_every_operation() {
        let backend = MemoryBackend::new();
        backend.set_unavailable(true);
        assert!(backend.ping().await.is_err());
        assert!(backend.put_record("k", &[]).await.is_err());
        assert!(backend.push_work("q", "x").await.is_err());

        backend.set_unavailable(false);
        assert!(backend.ping().await.is_ok());
    }
}
