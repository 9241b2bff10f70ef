use actix_web::{web, HttpResponse};

use crate::dto::{RefreshRequest, SessionResponse};
use crate::handlers::rotation_error_response;

use super::AppState;

/// Handler for `POST /session/refresh`.
///
/// Exchanges a valid refresh token for a new pair; the presented token dies
/// in the same store operation.
///
/// # Request Body
///
/// ```json
/// { "refresh_token": "eyJ..." }
/// ```
///
/// # Response
///
/// ## Success (200 OK): a new token pair.
///
/// ## Errors
/// - 401 `{"error": "SessionExpired"}`: token expired/unusable or no session
/// - 401 `{"error": "TokenReuseDetected"}`: a dead token was replayed; the
///   whole session has been revoked
/// - 503 `{"error": "TemporarilyUnavailable"}`: store unreachable, retry
pub async fn refresh_session(
    state: web::Data<AppState>,
    request: web::Json<RefreshRequest>,
) -> HttpResponse {
    match state.sessions.rotate(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(SessionResponse::from(pair)),
        Err(error) => rotation_error_response(&error),
    }
}
