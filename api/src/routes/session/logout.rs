use actix_web::{web, HttpResponse};

use tg_core::errors::RotationError;

use crate::dto::{ErrorBody, LogoutRequest};

use super::AppState;

/// Handler for `POST /session/logout`.
///
/// Revokes the session the refresh token belongs to. Always 200 for any
/// token, valid or not, present session or not: the response never leaks
/// whether a session existed. The only exception is a store outage, where the
/// revocation genuinely did not happen and the client must retry.
pub async fn logout(
    state: web::Data<AppState>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse {
    match state.sessions.revoke(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
        Err(RotationError::TemporarilyUnavailable) => {
            HttpResponse::ServiceUnavailable().json(ErrorBody::new("TemporarilyUnavailable"))
        }
        // revoke only fails on store trouble, but stay total.
        Err(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
    }
}
