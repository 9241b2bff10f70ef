use actix_web::HttpResponse;

use crate::dto::PrincipalResponse;
use crate::middleware::AuthPrincipal;

/// Handler for `GET /me`.
///
/// Sits behind the authentication gateway; exists so callers (and the
/// integration tests) have a canonical protected route. Returns the verified
/// principal the gateway attached.
pub async fn me(auth: AuthPrincipal) -> HttpResponse {
    HttpResponse::Ok().json(PrincipalResponse::from(auth.0))
}
