//! MySQL-backed durable session store.
//!
//! The durable backend trades a network hop for an audit trail and
//! multi-device sessions: one row per session key, a `token_family` id that
//! survives rotations, and `revoked` rows kept until the cleanup sweep
//! reclaims them after expiry. `delete` therefore marks instead of removing.
//!
//! Schema (see `migrations/001_create_refresh_sessions.sql`):
//!
//! ```sql
//! CREATE TABLE refresh_sessions (
//!     id            BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
//!     session_key   VARCHAR(128)    NOT NULL UNIQUE,
//!     principal_id  BIGINT UNSIGNED NOT NULL,
//!     token_hash    CHAR(64)        NOT NULL UNIQUE,
//!     token_family  CHAR(36)        NOT NULL,
//!     revoked       TINYINT(1)      NOT NULL DEFAULT 0,
//!     expires_at    DATETIME(6)     NOT NULL,
//!     created_at    DATETIME(6)     NOT NULL,
//!     updated_at    DATETIME(6)     NOT NULL,
//!     last_used_at  DATETIME(6)     NULL,
//!     INDEX idx_refresh_sessions_principal (principal_id),
//!     INDEX idx_refresh_sessions_expires (expires_at)
//! );
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tg_core::domain::SessionKey;
use tg_core::errors::StoreError;
use tg_core::stores::{ReplaceOutcome, SessionStore, SessionSweeper};

use crate::config::DatabaseConfig;

/// Durable session store over a MySQL pool, one live row per session key.
#[derive(Clone)]
pub struct MySqlSessionStore {
    pool: MySqlPool,
    op_timeout: Duration,
}

impl MySqlSessionStore {
    /// Connects a pool sized and bounded per configuration.
    pub async fn connect(config: DatabaseConfig) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.op_timeout_ms))
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::unavailable(format!("MySQL connect failed: {}", e)))?;

        info!(max_connections = config.max_connections, "session store connected to MySQL");
        Ok(Self {
            pool,
            op_timeout: Duration::from_millis(config.op_timeout_ms),
        })
    }

    /// Wraps an existing pool (tests, shared pools).
    pub fn with_pool(pool: MySqlPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    fn expiry_from_ttl(ttl: Duration) -> DateTime<Utc> {
        Utc::now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero())
    }

    /// Bound a query future by the configured timeout; both a database error
    /// and a timeout are `Unavailable`, never absence.
    async fn bounded<T, F>(&self, op_name: &str, fut: F) -> Result<T, StoreError>
    where
        F: std::future::Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(op = op_name, error = %e, "MySQL operation failed");
                Err(StoreError::unavailable(format!("{}: {}", op_name, e)))
            }
            Err(_) => {
                warn!(op = op_name, timeout = ?self.op_timeout, "MySQL operation timed out");
                Err(StoreError::unavailable(format!(
                    "{}: timed out after {:?}",
                    op_name, self.op_timeout
                )))
            }
        }
    }
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<String>, StoreError> {
        let row = self
            .bounded(
                "get",
                sqlx::query(
                    "SELECT token_hash FROM refresh_sessions \
                     WHERE session_key = ? AND revoked = 0 AND expires_at > ?",
                )
                .bind(key.to_string())
                .bind(Utc::now())
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(|r| r.get::<String, _>("token_hash")))
    }

    async fn put(
        &self,
        key: &SessionKey,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let expires_at = Self::expiry_from_ttl(ttl);
        // A fresh issue starts a new token family, even when it lands on an
        // existing row: the old lineage ended with the overwritten session.
        let family = Uuid::new_v4().to_string();
        debug!(key = %key, "storing session row");

        self.bounded(
            "put",
            sqlx::query(
                "INSERT INTO refresh_sessions \
                 (session_key, principal_id, token_hash, token_family, revoked, \
                  expires_at, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, 0, ?, ?, ?) \
                 ON DUPLICATE KEY UPDATE \
                 token_hash = VALUES(token_hash), token_family = VALUES(token_family), \
                 revoked = 0, expires_at = VALUES(expires_at), updated_at = VALUES(updated_at)",
            )
            .bind(key.to_string())
            .bind(key.principal_id)
            .bind(token_hash)
            .bind(family)
            .bind(expires_at)
            .bind(now)
            .bind(now)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn replace(
        &self,
        key: &SessionKey,
        expected_hash: &str,
        new_hash: &str,
        ttl: Duration,
    ) -> Result<ReplaceOutcome, StoreError> {
        let now = Utc::now();
        let expires_at = Self::expiry_from_ttl(ttl);

        // Optimistic conditional update: the WHERE clause is the compare, so
        // only the caller holding the live token can install its successor.
        let result = self
            .bounded(
                "replace",
                sqlx::query(
                    "UPDATE refresh_sessions \
                     SET token_hash = ?, expires_at = ?, updated_at = ?, last_used_at = ? \
                     WHERE session_key = ? AND token_hash = ? AND revoked = 0 \
                       AND expires_at > ?",
                )
                .bind(new_hash)
                .bind(expires_at)
                .bind(now)
                .bind(now)
                .bind(key.to_string())
                .bind(expected_hash)
                .bind(now)
                .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() > 0 {
            return Ok(ReplaceOutcome::Replaced);
        }

        // Distinguish a dead/foreign token from an absent session.
        let live = self
            .bounded(
                "replace.classify",
                sqlx::query(
                    "SELECT 1 FROM refresh_sessions \
                     WHERE session_key = ? AND revoked = 0 AND expires_at > ?",
                )
                .bind(key.to_string())
                .bind(now)
                .fetch_optional(&self.pool),
            )
            .await?;

        if live.is_some() {
            Ok(ReplaceOutcome::Mismatch)
        } else {
            Ok(ReplaceOutcome::Missing)
        }
    }

    async fn delete(&self, key: &SessionKey) -> Result<bool, StoreError> {
        // Revoked rows stay for the audit trail; the sweep reclaims them.
        let result = self
            .bounded(
                "delete",
                sqlx::query(
                    "UPDATE refresh_sessions SET revoked = 1, updated_at = ? \
                     WHERE session_key = ? AND revoked = 0",
                )
                .bind(Utc::now())
                .bind(key.to_string())
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all(&self, principal_id: u64) -> Result<usize, StoreError> {
        let result = self
            .bounded(
                "revoke_all",
                sqlx::query(
                    "UPDATE refresh_sessions SET revoked = 1, updated_at = ? \
                     WHERE principal_id = ? AND revoked = 0",
                )
                .bind(Utc::now())
                .bind(principal_id)
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() as usize)
    }
}

#[async_trait]
impl SessionSweeper for MySqlSessionStore {
    async fn delete_expired(&self) -> Result<usize, StoreError> {
        let result = self
            .bounded(
                "delete_expired",
                sqlx::query("DELETE FROM refresh_sessions WHERE expires_at < ?")
                    .bind(Utc::now())
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() as usize)
    }
}
