//! Maps the internal rotation taxonomy onto the external error vocabulary.
//!
//! Clients get exactly three answers: a new pair, "re-authenticate", or
//! "retry later". Codec-level detail (expired vs. malformed vs. forged) is
//! collapsed so the refresh endpoint is not an oracle; reuse detection is the
//! one named security outcome.

use actix_web::HttpResponse;
use tracing::debug;

use tg_core::errors::RotationError;

use crate::dto::ErrorBody;

pub fn rotation_error_response(error: &RotationError) -> HttpResponse {
    debug!(error = %error, "session operation rejected");

    match error {
        RotationError::TokenReuseDetected => {
            HttpResponse::Unauthorized().json(ErrorBody::new("TokenReuseDetected"))
        }
        RotationError::RotationConflict => {
            HttpResponse::Unauthorized().json(ErrorBody::new("TokenReuseDetected"))
        }
        RotationError::TemporarilyUnavailable => {
            HttpResponse::ServiceUnavailable().json(ErrorBody::new("TemporarilyUnavailable"))
        }
        RotationError::SessionExpired | RotationError::Token(_) => {
            HttpResponse::Unauthorized().json(ErrorBody::new("SessionExpired"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use tg_core::errors::TokenError;

    #[test]
    fn test_reuse_maps_to_401_with_code() {
        let resp = rotation_error_response(&RotationError::TokenReuseDetected);
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_outage_maps_to_503() {
        let resp = rotation_error_response(&RotationError::TemporarilyUnavailable);
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_codec_detail_collapses_to_session_expired() {
        for error in [
            RotationError::SessionExpired,
            RotationError::Token(TokenError::Malformed),
            RotationError::Token(TokenError::BadSignature),
            RotationError::Token(TokenError::WrongType),
        ] {
            let resp = rotation_error_response(&error);
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
