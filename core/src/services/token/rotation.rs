//! The rotation state machine: issue, rotate with reuse detection, revoke.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{Principal, SessionKey, TokenPair, TokenType};
use crate::errors::{RotationError, RotationResult, TokenError};
use crate::stores::{ReplaceOutcome, SessionStore};

use super::codec::TokenCodec;

/// Drives the per-session lifecycle over any [`SessionStore`] backend.
///
/// The store holds exactly one refresh-token hash per session key, so at any
/// instant at most one refresh token is alive for a session. Rotation is a
/// single atomic conditional replace; a mismatch burns the whole session.
pub struct RotationService {
    store: Arc<dyn SessionStore>,
    codec: TokenCodec,
}

impl RotationService {
    pub fn new(store: Arc<dyn SessionStore>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.codec.config().refresh_ttl_secs.max(0) as u64)
    }

    /// Mints a session for an externally authenticated principal.
    ///
    /// Overwrites any previous session under the same key: logging in again
    /// replaces the old session rather than stacking a second one.
    pub async fn issue(
        &self,
        principal: &Principal,
        device: Option<String>,
    ) -> RotationResult<TokenPair> {
        let access = self
            .codec
            .issue_access(principal)
            .map_err(RotationError::Token)?;
        let refresh = self
            .codec
            .issue_refresh(principal, device.clone())
            .map_err(RotationError::Token)?;

        let key = SessionKey::with_device(principal.id, device);
        self.store
            .put(&key, &self.codec.hash(&refresh), self.refresh_ttl())
            .await?;

        debug!(principal_id = principal.id, %key, "session issued");
        Ok(self.pair(access, refresh))
    }

    /// Exchanges a valid refresh token for a new pair, invalidating the old
    /// token in the same store operation.
    ///
    /// Outcomes:
    /// - token unusable (expired, garbage, bad signature) -> `SessionExpired`
    /// - wrong token kind -> `WrongType`, preserved as a protocol misuse
    /// - no stored session -> `SessionExpired`
    /// - stored hash differs -> the whole session is revoked and the call
    ///   fails `TokenReuseDetected`; a rotator losing a concurrent race lands
    ///   here too, since the store cannot tell a race from a replay
    /// - store unreachable -> `TemporarilyUnavailable`, never mistaken for an
    ///   absent session
    pub async fn rotate(&self, presented: &str) -> RotationResult<TokenPair> {
        let claims = self
            .codec
            .verify(presented, TokenType::Refresh)
            .map_err(|e| match e {
                TokenError::WrongType => RotationError::Token(TokenError::WrongType),
                // Expired, malformed, forged: all collapse to the same answer
                // so the refresh path is not an oracle.
                _ => RotationError::SessionExpired,
            })?;
        let principal = claims.principal().map_err(|_| RotationError::SessionExpired)?;
        let key = SessionKey::with_device(principal.id, claims.device.clone());

        let presented_hash = self.codec.hash(presented);
        let new_access = self
            .codec
            .issue_access(&principal)
            .map_err(RotationError::Token)?;
        let new_refresh = self
            .codec
            .issue_refresh(&principal, claims.device)
            .map_err(RotationError::Token)?;
        let new_hash = self.codec.hash(&new_refresh);

        match self
            .store
            .replace(&key, &presented_hash, &new_hash, self.refresh_ttl())
            .await?
        {
            ReplaceOutcome::Replaced => {
                debug!(principal_id = principal.id, %key, "session rotated");
                Ok(self.pair(new_access, new_refresh))
            }
            ReplaceOutcome::Missing => Err(RotationError::SessionExpired),
            ReplaceOutcome::Mismatch => {
                // Security event: a dead token was presented, or the session
                // hash no longer matches anything we handed out. Burning the
                // session is the only safe response either way.
                warn!(
                    principal_id = principal.id,
                    %key,
                    presented_hash = %presented_hash,
                    "refresh token reuse detected; revoking session"
                );
                if let Err(e) = self.store.delete(&key).await {
                    warn!(principal_id = principal.id, %key, error = %e,
                        "failed to revoke session after reuse detection");
                }
                Err(RotationError::TokenReuseDetected)
            }
        }
    }

    /// Revokes the session a refresh token belongs to.
    ///
    /// Idempotent and silent: an unusable token or an already-absent session
    /// is a success, so callers learn nothing about prior state. Only a store
    /// outage is surfaced, because then the revocation genuinely did not
    /// happen.
    pub async fn revoke(&self, presented: &str) -> RotationResult<()> {
        let claims = match self.codec.verify(presented, TokenType::Refresh) {
            Ok(claims) => claims,
            Err(_) => return Ok(()),
        };
        let principal = match claims.principal() {
            Ok(principal) => principal,
            Err(_) => return Ok(()),
        };

        let key = SessionKey::with_device(principal.id, claims.device);
        let deleted = self.store.delete(&key).await?;
        info!(principal_id = principal.id, %key, deleted, "session revoked");
        Ok(())
    }

    /// Revokes every session for a principal ("log out of all devices").
    pub async fn revoke_all(&self, principal_id: u64) -> RotationResult<usize> {
        let revoked = self.store.revoke_all(principal_id).await?;
        info!(principal_id, revoked, "all sessions revoked");
        Ok(revoked)
    }

    fn pair(&self, access: String, refresh: String) -> TokenPair {
        let config = self.codec.config();
        TokenPair::new(access, refresh, config.access_ttl_secs, config.refresh_ttl_secs)
    }
}
