//! In-memory session store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::SessionKey;
use crate::errors::StoreError;

use super::r#trait::{ReplaceOutcome, SessionStore, SessionSweeper};

struct Entry {
    token_hash: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// TTL-aware in-memory store, for tests only.
///
/// Entries lapse lazily on access, which is close enough to real TTL
/// semantics for the rotation-path tests. The `fail` toggle makes every call
/// return [`StoreError::Unavailable`], for outage-path tests.
pub struct MockSessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    fail: AtomicBool,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail.store(unavailable, Ordering::SeqCst);
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| !e.is_expired())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::unavailable("mock store marked unavailable"))
        } else {
            Ok(())
        }
    }

    fn ttl_to_expiry(ttl: Duration) -> DateTime<Utc> {
        Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero())
    }
}

impl Default for MockSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        Ok(entries
            .get(&key.to_string())
            .filter(|e| !e.is_expired())
            .map(|e| e.token_hash.clone()))
    }

    async fn put(
        &self,
        key: &SessionKey,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                token_hash: token_hash.to_string(),
                expires_at: Self::ttl_to_expiry(ttl),
            },
        );
        Ok(())
    }

    async fn replace(
        &self,
        key: &SessionKey,
        expected_hash: &str,
        new_hash: &str,
        ttl: Duration,
    ) -> Result<ReplaceOutcome, StoreError> {
        self.check_available()?;
        let key = key.to_string();
        let mut entries = self.entries.write().await;

        if matches!(entries.get(&key), Some(entry) if entry.is_expired()) {
            entries.remove(&key);
            return Ok(ReplaceOutcome::Missing);
        }

        match entries.get_mut(&key) {
            None => Ok(ReplaceOutcome::Missing),
            Some(entry) if entry.token_hash != expected_hash => Ok(ReplaceOutcome::Mismatch),
            Some(entry) => {
                entry.token_hash = new_hash.to_string();
                entry.expires_at = Self::ttl_to_expiry(ttl);
                Ok(ReplaceOutcome::Replaced)
            }
        }
    }

    async fn delete(&self, key: &SessionKey) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        Ok(entries.remove(&key.to_string()).is_some())
    }

    async fn revoke_all(&self, principal_id: u64) -> Result<usize, StoreError> {
        self.check_available()?;
        let prefix = format!("session:{}", principal_id);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|k, _| {
            !(k == &prefix || k.starts_with(&format!("{}:", prefix)))
        });
        Ok(before - entries.len())
    }
}

#[async_trait]
impl SessionSweeper for MockSessionStore {
    async fn delete_expired(&self) -> Result<usize, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired());
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MockSessionStore::new();
        let key = SessionKey::new(1);

        assert_eq!(store.get(&key).await.unwrap(), None);

        store.put(&key, "hash-a", TTL).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some("hash-a".to_string()));

        assert!(store.delete(&key).await.unwrap());
        assert!(!store.delete(&key).await.unwrap());
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_outcomes() {
        let store = MockSessionStore::new();
        let key = SessionKey::new(1);

        assert_eq!(
            store.replace(&key, "a", "b", TTL).await.unwrap(),
            ReplaceOutcome::Missing
        );

        store.put(&key, "a", TTL).await.unwrap();
        assert_eq!(
            store.replace(&key, "a", "b", TTL).await.unwrap(),
            ReplaceOutcome::Replaced
        );
        assert_eq!(
            store.replace(&key, "a", "c", TTL).await.unwrap(),
            ReplaceOutcome::Mismatch
        );
        assert_eq!(store.get(&key).await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let store = MockSessionStore::new();
        let key = SessionKey::new(1);

        store.put(&key, "hash", Duration::ZERO).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);
        assert_eq!(
            store.replace(&key, "hash", "next", TTL).await.unwrap(),
            ReplaceOutcome::Missing
        );
    }

    #[tokio::test]
    async fn test_revoke_all_only_touches_the_principal() {
        let store = MockSessionStore::new();
        store.put(&SessionKey::new(1), "a", TTL).await.unwrap();
        store
            .put(&SessionKey::with_device(1, Some("tablet".to_string())), "b", TTL)
            .await
            .unwrap();
        store.put(&SessionKey::new(12), "c", TTL).await.unwrap();

        assert_eq!(store.revoke_all(1).await.unwrap(), 2);
        assert_eq!(store.get(&SessionKey::new(12)).await.unwrap(), Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_unavailable_toggle() {
        let store = MockSessionStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.get(&SessionKey::new(1)).await,
            Err(StoreError::Unavailable { .. })
        ));

        store.set_unavailable(false);
        assert!(store.get(&SessionKey::new(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = MockSessionStore::new();
        store.put(&SessionKey::new(1), "a", Duration::ZERO).await.unwrap();
        store.put(&SessionKey::new(2), "b", TTL).await.unwrap();

        assert_eq!(store.delete_expired().await.unwrap(), 1);
        assert_eq!(store.get(&SessionKey::new(2)).await.unwrap(), Some("b".to_string()));
    }
}
