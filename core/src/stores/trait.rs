//! Session store trait: the single abstraction over TTL backends.
//!
//! Stores hold exactly one value per session key: the SHA-256 hash of the
//! currently valid refresh token. Raw tokens never reach a backend.
//!
//! # Contract
//! - Absence is `Ok(None)` / [`ReplaceOutcome::Missing`], never an error.
//!   [`StoreError::Unavailable`] is reserved for outages and timeouts so the
//!   rotation service can tell "no session" apart from "cannot know".
//! - Every call must be bounded by a timeout; implementations are expected to
//!   retry transient failures a bounded number of times before giving up.
//! - `replace` must be atomic: no interleaving of two replacements may result
//!   in a silent overwrite of one caller's successor by the other's.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::SessionKey;
use crate::errors::StoreError;

/// Result of an atomic conditional replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The expected hash matched and the new hash was installed.
    Replaced,
    /// A record exists but holds a different hash. Either a dead token was
    /// replayed or a concurrent rotation won; the caller decides.
    Mismatch,
    /// No record exists under the key (never created, deleted, or TTL-lapsed).
    Missing,
}

/// TTL key-value store for refresh-token hashes, shared across instances.
///
/// Backed by a network-accessible store, never process memory: many service
/// instances operate on the same sessions concurrently.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the stored hash for a session key.
    async fn get(&self, key: &SessionKey) -> Result<Option<String>, StoreError>;

    /// Install a hash under a key with the given TTL, overwriting any
    /// previous value. Used at issue time, where last-write-wins is the
    /// intended semantics.
    async fn put(
        &self,
        key: &SessionKey,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Atomically replace `expected_hash` with `new_hash`, resetting the TTL.
    ///
    /// Only the caller holding the currently valid token can install its
    /// successor; a losing concurrent caller observes
    /// [`ReplaceOutcome::Mismatch`].
    async fn replace(
        &self,
        key: &SessionKey,
        expected_hash: &str,
        new_hash: &str,
        ttl: Duration,
    ) -> Result<ReplaceOutcome, StoreError>;

    /// Remove the record for a key. Idempotent: deleting an absent key is
    /// `Ok(false)`.
    async fn delete(&self, key: &SessionKey) -> Result<bool, StoreError>;

    /// Revoke every session belonging to a principal ("log out of all
    /// devices"). Returns the number of sessions revoked.
    async fn revoke_all(&self, principal_id: u64) -> Result<usize, StoreError>;
}

/// Reclaims storage in durable backends.
///
/// Redis-style backends expire entries natively and do not implement this;
/// the durable/audit backend keeps rows until swept.
#[async_trait]
pub trait SessionSweeper: Send + Sync {
    /// Delete every row whose expiry is in the past. Idempotent and
    /// order-independent, so a partial sweep is always safe to resume.
    async fn delete_expired(&self) -> Result<usize, StoreError>;
}
