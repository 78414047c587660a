//! Redis backend adapter.
//!
//! Records are Redis hashes; the work queue is a Redis list (`LPUSH` on the
//! producer side, `BRPOP` on the consumer side, so delivery is FIFO).
//!
//! The adapter holds a lazily established [`MultiplexedConnection`]: building
//! the client touches no network, so the process starts and serves `/health`
//! even while Redis is down, and the first successful operation caches the
//! connection for reuse. Clones of a multiplexed connection share one TCP
//! stream and are safe to use from concurrent requests. Every connect and
//! command round-trip is bounded by [`OP_TIMEOUT`]; on timeout or error the
//! cached connection is dropped so the next operation reconnects.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use ::redis::aio::MultiplexedConnection;
use ::redis::AsyncCommands;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::debug;

use super::{Backend, BackendError};

/// Bound on every connect and command round-trip.
const OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis implementation of [`Backend`].
pub struct RedisBackend {
    client: ::redis::Client,
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisBackend {
    /// Create a backend for the given `redis://` URL.
    ///
    /// Does not touch the network; the connection is established on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unavailable` only if the URL itself is
    /// malformed.
    pub fn new(url: &str) -> Result<Self, BackendError> {
        let client = ::redis::Client::open(url)
            .map_err(|e| BackendError::Unavailable(format!("invalid Redis URL: {}", e)))?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
        })
    }

    /// Get the cached connection, establishing it if necessary.
    async fn connection(&self) -> Result<MultiplexedConnection, BackendError> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = timeout(OP_TIMEOUT, self.client.get_multiplexed_async_connection())
            .await
            .map_err(|_| {
                BackendError::Unavailable("timed out connecting to Redis".to_string())
            })?
            .map_err(|e| {
                BackendError::Unavailable(format!("failed to connect to Redis: {}", e))
            })?;

        debug!("Established Redis connection");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Run one command future under the operation timeout, dropping the
    /// cached connection on any failure so the next call reconnects.
    async fn run<T, F>(&self, context: &str, fut: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, ::redis::RedisError>>,
    {
        match timeout(OP_TIMEOUT, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                *self.conn.lock().await = None;
                Err(BackendError::Unavailable(format!("{} failed: {}", context, e)))
            }
            Err(_) => {
                *self.conn.lock().await = None;
                Err(BackendError::Unavailable(format!(
                    "{} timed out after {:?}",
                    context, OP_TIMEOUT
                )))
            }
        }
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn put_record(&self, key: &str, fields: &[(&str, String)]) -> Result<(), BackendError> {
        let mut conn = self.connection().await?;
        self.run("HSET", async move {
            let _: () = conn.hset_multiple(key, fields).await?;
            Ok(())
        })
        .await
    }

    async fn get_record(&self, key: &str) -> Result<HashMap<String, String>, BackendError> {
        let mut conn = self.connection().await?;
        self.run("HGETALL", async move {
            let fields: HashMap<String, String> = conn.hgetall(key).await?;
            Ok(fields)
        })
        .await
    }

    async fn push_work(&self, queue: &str, payload: &str) -> Result<(), BackendError> {
        let mut conn = self.connection().await?;
        self.run("LPUSH", async move {
            let _: () = conn.lpush(queue, payload).await?;
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let mut conn = self.connection().await?;
        self.run("PING", async move {
            let _: String = ::redis::cmd("PING").query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }
}
