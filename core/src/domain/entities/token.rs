//! Token entities: JWT claims and the issued token pair.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

use super::principal::Principal;

/// JWT issuer
pub const JWT_ISSUER: &str = "tokengate";

/// JWT audience
pub const JWT_AUDIENCE: &str = "tokengate-api";

/// Discriminates access tokens from refresh tokens inside the signed claims.
///
/// The claim exists in addition to the disjoint signing secrets: it is what
/// lets verification report a cross-type presentation as `WrongType` instead
/// of a bare signature failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal id)
    pub sub: String,

    /// Principal email
    pub email: String,

    /// Token kind: "access" or "refresh"
    pub token_type: TokenType,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Device label, carried only by refresh tokens of per-device sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Claims {
    /// Creates claims for an access token with the given lifetime.
    pub fn new_access(principal: &Principal, ttl_secs: i64) -> Self {
        Self::new(principal, TokenType::Access, ttl_secs, None)
    }

    /// Creates claims for a refresh token with the given lifetime.
    pub fn new_refresh(principal: &Principal, ttl_secs: i64, device: Option<String>) -> Self {
        Self::new(principal, TokenType::Refresh, ttl_secs, device)
    }

    fn new(
        principal: &Principal,
        token_type: TokenType,
        ttl_secs: i64,
        device: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl_secs);

        Self {
            sub: principal.id.to_string(),
            email: principal.email.clone(),
            token_type,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
            device,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Checks if the claims are currently valid (after nbf, before exp)
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Recovers the principal these claims were issued for.
    pub fn principal(&self) -> Result<Principal, TokenError> {
        let id = self.sub.parse::<u64>().map_err(|_| TokenError::Malformed)?;
        Ok(Principal::new(id, self.email.clone()))
    }
}

/// Token pair returned to the client on issue and on every rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in: access_ttl_secs,
            refresh_expires_in: refresh_ttl_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let principal = Principal::new(42, "user@example.com");
        let claims = Claims::new_access(&principal, 900);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.aud, JWT_AUDIENCE);
        assert!(claims.device.is_none());
        assert!(claims.is_valid());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_claims_carry_device() {
        let principal = Principal::new(42, "user@example.com");
        let claims = Claims::new_refresh(&principal, 604_800, Some("tablet".to_string()));

        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.device.as_deref(), Some("tablet"));
        assert!(claims.is_valid());
    }

    #[test]
    fn test_claims_principal_round_trip() {
        let principal = Principal::new(7, "p@example.com");
        let claims = Claims::new_access(&principal, 900);

        assert_eq!(claims.principal().unwrap(), principal);
    }

    #[test]
    fn test_claims_bad_subject_is_malformed() {
        let principal = Principal::new(7, "p@example.com");
        let mut claims = Claims::new_access(&principal, 900);
        claims.sub = "not-a-number".to_string();

        assert!(matches!(claims.principal(), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_claims_expiration() {
        let principal = Principal::new(7, "p@example.com");
        let mut claims = Claims::new_access(&principal, 900);
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
        assert!(!claims.is_valid());
    }

    #[test]
    fn test_claims_not_before() {
        let principal = Principal::new(7, "p@example.com");
        let mut claims = Claims::new_access(&principal, 900);
        claims.nbf = Utc::now().timestamp() + 3600;

        assert!(!claims.is_valid());
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(serde_json::to_string(&TokenType::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
    }

    #[test]
    fn test_token_pair_expiry_seconds() {
        let pair = TokenPair::new("a".to_string(), "r".to_string(), 900, 604_800);

        assert_eq!(pair.expires_in, 900);
        assert_eq!(pair.refresh_expires_in, 604_800);
    }

    #[test]
    fn test_claims_serialization() {
        let principal = Principal::new(42, "user@example.com");
        let claims = Claims::new_refresh(&principal, 604_800, None);

        let json = serde_json::to_string(&claims).unwrap();
        // device is omitted entirely when not set
        assert!(!json.contains("device"));

        let deserialized: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, deserialized);
    }
}
