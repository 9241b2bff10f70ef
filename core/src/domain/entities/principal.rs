//! The verified identity carried by tokens, and the session key derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The identity a token represents: an opaque numeric id plus an email.
///
/// This is the only identity the session core knows about. Who the principal
/// is, whether their credentials were valid, and what they may do are all
/// decided by external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque numeric identifier assigned by the calling system
    pub id: u64,

    /// Email address carried into access-token claims
    pub email: String,
}

impl Principal {
    pub fn new(id: u64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Key under which a principal's current refresh-token hash is stored.
///
/// Renders as `session:{principal_id}` or, for multi-device backends,
/// `session:{principal_id}:{device}`. The store only ever sees the rendered
/// form; backends that need the principal id (bulk revocation) read it from
/// the structured key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    pub principal_id: u64,
    pub device: Option<String>,
}

impl SessionKey {
    /// Key for the principal's single default session.
    pub fn new(principal_id: u64) -> Self {
        Self {
            principal_id,
            device: None,
        }
    }

    /// Key for a per-device session.
    pub fn with_device(principal_id: u64, device: Option<String>) -> Self {
        Self {
            principal_id,
            device,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.device {
            Some(device) => write!(f, "session:{}:{}", self.principal_id, device),
            None => write!(f, "session:{}", self.principal_id),
        }
    }
}
