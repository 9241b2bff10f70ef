//! Environment-driven configuration for the API binary.

use std::env;

use tg_core::services::token::{CleanupConfig, TokenConfig};
use tg_infra::{DatabaseConfig, StoreConfig};

/// Which session store backend to wire. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    MySql,
}

/// Everything the binary consumes from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_address: String,
    pub backend: StoreBackend,
    pub tokens: TokenConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub cleanup: CleanupConfig,
}

impl ApiConfig {
    /// Loads configuration from the environment, with development defaults
    /// for everything except the signing secrets in production use.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_address = format!(
            "{}:{}",
            env_or("SERVER_HOST", "127.0.0.1"),
            env_or("SERVER_PORT", "8080")
        );

        let backend = match env_or("SESSION_BACKEND", "redis").as_str() {
            "redis" => StoreBackend::Redis,
            "mysql" => StoreBackend::MySql,
            other => anyhow::bail!("unknown SESSION_BACKEND '{}'; expected redis or mysql", other),
        };

        let defaults = TokenConfig::default();
        let tokens = TokenConfig {
            access_secret: env_or("ACCESS_TOKEN_SECRET", &defaults.access_secret),
            refresh_secret: env_or("REFRESH_TOKEN_SECRET", &defaults.refresh_secret),
            access_ttl_secs: env_parsed("ACCESS_TOKEN_TTL_SECS", defaults.access_ttl_secs)?,
            refresh_ttl_secs: env_parsed("REFRESH_TOKEN_TTL_SECS", defaults.refresh_ttl_secs)?,
        };

        let store_defaults = StoreConfig::default();
        let store = StoreConfig {
            url: env_or("REDIS_URL", &store_defaults.url),
            op_timeout_ms: env_parsed("STORE_OP_TIMEOUT_MS", store_defaults.op_timeout_ms)?,
            max_retries: env_parsed("STORE_MAX_RETRIES", store_defaults.max_retries)?,
            retry_delay_ms: env_parsed("STORE_RETRY_DELAY_MS", store_defaults.retry_delay_ms)?,
        };

        let db_defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env_or("DATABASE_URL", &db_defaults.url),
            max_connections: env_parsed("DATABASE_MAX_CONNECTIONS", db_defaults.max_connections)?,
            op_timeout_ms: env_parsed("DATABASE_OP_TIMEOUT_MS", db_defaults.op_timeout_ms)?,
        };

        let cleanup_defaults = CleanupConfig::default();
        let cleanup = CleanupConfig {
            interval_secs: env_parsed("CLEANUP_INTERVAL_SECS", cleanup_defaults.interval_secs)?,
            enabled: env_parsed("CLEANUP_ENABLED", cleanup_defaults.enabled)?,
        };

        Ok(Self {
            bind_address,
            backend,
            tokens,
            store,
            database,
            cleanup,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_env() {
        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.backend, StoreBackend::Redis);
        assert!(config.cleanup.enabled);
    }
}
