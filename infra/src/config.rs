//! Backend configuration.

use serde::{Deserialize, Serialize};

/// Redis store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Redis connection URL
    pub url: String,
    /// Per-operation timeout in milliseconds; a timeout surfaces as
    /// `Unavailable`, never as an absent session
    pub op_timeout_ms: u64,
    /// Maximum attempts per operation (first try included)
    pub max_retries: u32,
    /// Base delay between retries in milliseconds (exponential backoff)
    pub retry_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            op_timeout_ms: 2000,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

/// MySQL durable-backend settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// MySQL connection URL
    pub url: String,
    /// Connection pool size
    pub max_connections: u32,
    /// Per-query timeout in milliseconds
    pub op_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mysql://localhost:3306/tokengate".to_string(),
            max_connections: 10,
            op_timeout_ms: 2000,
        }
    }
}
