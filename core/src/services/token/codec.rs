//! Stateless signer/verifier for access and refresh tokens.

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use sha2::{Digest, Sha256};

use crate::domain::{Claims, Principal, TokenType, JWT_AUDIENCE, JWT_ISSUER};
use crate::errors::TokenError;

use super::config::TokenConfig;

/// Signs and verifies both token kinds with independent HS256 secrets.
///
/// Completely stateless: verification is a local signature check plus claim
/// validation, with no store lookup. That makes access tokens irrevocable
/// before natural expiry, which is the accepted trade for keeping the hot
/// request path free of network round trips.
#[derive(Clone)]
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    probe_validation: Validation,
    config: TokenConfig,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // The expiry-vs-reuse distinction downstream is exact, so no leeway.
        validation.leeway = 0;

        // Used only to classify a signature failure as a cross-type
        // presentation: signature must still match, claims may be stale.
        let mut probe_validation = Validation::new(Algorithm::HS256);
        probe_validation.set_required_spec_claims::<&str>(&[]);
        probe_validation.validate_exp = false;
        probe_validation.validate_nbf = false;

        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            probe_validation,
            config,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Signs a short-lived access token carrying id and email.
    pub fn issue_access(&self, principal: &Principal) -> Result<String, TokenError> {
        let claims = Claims::new_access(principal, self.config.access_ttl_secs);
        self.encode_jwt(&claims, &self.access_encoding)
    }

    /// Signs a long-lived refresh token; `device` distinguishes per-device
    /// sessions and is echoed back into the session key on rotation.
    pub fn issue_refresh(
        &self,
        principal: &Principal,
        device: Option<String>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new_refresh(principal, self.config.refresh_ttl_secs, device);
        self.encode_jwt(&claims, &self.refresh_encoding)
    }

    fn encode_jwt(&self, claims: &Claims, key: &EncodingKey) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|_| TokenError::GenerationFailed)
    }

    /// Verifies a token of the expected kind and returns its claims.
    ///
    /// Fails with `Expired`, `BadSignature`, `Malformed`, or `WrongType`.
    /// `WrongType` is reported both when the type claim mismatches and when
    /// the signature only checks out under the other kind's secret, so an
    /// access token replayed at the refresh path is named for what it is.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let (decoding, other_decoding) = match expected {
            TokenType::Access => (&self.access_decoding, &self.refresh_decoding),
            TokenType::Refresh => (&self.refresh_decoding, &self.access_decoding),
        };

        match decode::<Claims>(token, decoding, &self.validation) {
            Ok(data) if data.claims.token_type == expected => Ok(data.claims),
            Ok(_) => Err(TokenError::WrongType),
            Err(e) => {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                    ErrorKind::ImmatureSignature => Err(TokenError::NotYetValid),
                    ErrorKind::InvalidSignature => {
                        match decode::<Claims>(token, other_decoding, &self.probe_validation) {
                            Ok(data) if data.claims.token_type != expected => {
                                Err(TokenError::WrongType)
                            }
                            _ => Err(TokenError::BadSignature),
                        }
                    }
                    _ => Err(TokenError::Malformed),
                }
            }
        }
    }

    /// Deterministic one-way digest of a token, for storage and comparison.
    /// The raw token value never reaches a store or a log line.
    pub fn hash(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
