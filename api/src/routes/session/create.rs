use actix_web::{web, HttpResponse};

use tg_core::domain::Principal;

use crate::dto::{IssueSessionRequest, SessionResponse};
use crate::handlers::rotation_error_response;

use super::AppState;

/// Handler for `POST /session`.
///
/// Called by the external login/OAuth flow after it has independently
/// verified credentials; mints an access/refresh pair and installs the
/// session.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "expires_in": 900
/// }
/// ```
///
/// ## Errors
/// - 503 Service Unavailable: session store unreachable
pub async fn create_session(
    state: web::Data<AppState>,
    request: web::Json<IssueSessionRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    let principal = Principal::new(request.principal_id, request.email);

    match state.sessions.issue(&principal, request.device).await {
        Ok(pair) => HttpResponse::Ok().json(SessionResponse::from(pair)),
        Err(error) => rotation_error_response(&error),
    }
}
