//! Session endpoint DTOs.

use serde::{Deserialize, Serialize};

use tg_core::domain::{Principal, TokenPair};

/// Body of `POST /session`.
///
/// Sent by the external login/OAuth flow after it has independently verified
/// credentials; this service never sees a password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSessionRequest {
    pub principal_id: u64,
    pub email: String,
    /// Optional device label for multi-device backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

/// Body of `POST /session/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body of `POST /session/logout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Token pair returned on issue and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl From<TokenPair> for SessionResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        }
    }
}

/// The verified identity, as returned by protected routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalResponse {
    pub principal_id: u64,
    pub email: String,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        Self {
            principal_id: principal.id,
            email: principal.email,
        }
    }
}

/// Structured error body; the `error` code is the whole vocabulary clients
/// get, deliberately coarse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>) -> Self {
        Self { error: code.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_response_from_pair() {
        let pair = TokenPair::new("a".to_string(), "r".to_string(), 900, 604_800);
        let resp = SessionResponse::from(pair);

        assert_eq!(resp.access_token, "a");
        assert_eq!(resp.refresh_token, "r");
        assert_eq!(resp.expires_in, 900);
    }

    #[test]
    fn test_issue_request_device_is_optional() {
        let req: IssueSessionRequest =
            serde_json::from_str(r#"{"principal_id": 42, "email": "u@example.com"}"#).unwrap();
        assert_eq!(req.principal_id, 42);
        assert!(req.device.is_none());
    }
}
