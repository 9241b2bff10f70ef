//! Error taxonomy for the session lifecycle core.
//!
//! Three layers, collapsed outward: `TokenError` from the codec, `StoreError`
//! from session store backends, and `RotationError` as the vocabulary the
//! rotation service exposes to callers. Store absence is never an error
//! (`Ok(None)`), so an outage can never be misread as a missing session.

use thiserror::Error;

/// Verification and signing failures from the token codec.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature verification failed")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token is not yet valid")]
    NotYetValid,

    #[error("Wrong token type for this operation")]
    WrongType,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Failures from a session store backend.
///
/// Deliberately has no "not found" variant: lookups return `Ok(None)` for
/// absence. `Unavailable` covers timeouts, connection loss, and exhausted
/// retries, and must always surface as a retryable condition.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the rotation service.
///
/// Low-level codec and store failures are collapsed here into the minimal
/// externally visible vocabulary: everything a client can act on is either
/// "re-authenticate" or "retry later". The one deliberate exception is
/// `WrongType`, preserved so an access token presented at the refresh path is
/// rejected as a protocol misuse rather than a dead session.
#[derive(Error, Debug)]
pub enum RotationError {
    /// The session is absent, expired, or the presented token is unusable.
    #[error("Session expired or absent; re-authentication required")]
    SessionExpired,

    /// An already-rotated refresh token was presented. The whole session has
    /// been revoked.
    #[error("Refresh token reuse detected; session revoked")]
    TokenReuseDetected,

    /// A concurrent rotation installed a different successor first. Only
    /// backends that can distinguish a race from a replay produce this;
    /// neither shipped backend does.
    #[error("Concurrent rotation conflict")]
    RotationConflict,

    /// The session store could not be reached; the caller should retry, not
    /// force a re-login.
    #[error("Session store temporarily unavailable")]
    TemporarilyUnavailable,

    #[error(transparent)]
    Token(TokenError),
}

impl From<StoreError> for RotationError {
    fn from(_: StoreError) -> Self {
        RotationError::TemporarilyUnavailable
    }
}

pub type RotationResult<T> = Result<T, RotationError>;
