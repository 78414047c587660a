//! Configuration management.
//!
//! Configuration can be set via environment variables:
//! - `REDIS_HOST` - Optional. Redis host. Defaults to `localhost`.
//! - `REDIS_PORT` - Optional. Redis port. Defaults to `6379`.
//! - `HOST` - Optional. Server bind host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//!
//! The worker binary additionally reads `WORKER_ID` (defaults to `worker-1`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis host
    pub redis_host: String,

    /// Redis port
    pub redis_port: u16,

    /// Server bind host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a default suitable for local single-node use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a port variable is set but not
    /// parseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let redis_host =
            std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());

        let redis_port = std::env::var("REDIS_PORT")
            .unwrap_or_else(|_| "6379".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("REDIS_PORT".to_string(), format!("{}", e)))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        Ok(Self {
            redis_host,
            redis_port,
            host,
            port,
        })
    }

    /// Connection URL for the Redis backend.
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}", self.redis_host, self.redis_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
