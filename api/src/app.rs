//! Application wiring shared by `main` and the integration tests.

use std::sync::Arc;

use actix_web::web;

use tg_core::services::token::RotationService;

use crate::middleware::AuthGateway;
use crate::routes::session::{create_session, logout, me, refresh_session, AppState};

/// Registers session routes and the authentication gateway on an app.
///
/// The session lifecycle routes take raw tokens in their bodies and are not
/// behind the gateway; everything else is.
pub fn configure_app(cfg: &mut web::ServiceConfig, sessions: Arc<RotationService>) {
    let codec = sessions.codec().clone();

    cfg.app_data(web::Data::new(AppState::new(sessions)))
        .app_data(web::Data::new(codec))
        .service(
            web::scope("/session")
                .route("", web::post().to(create_session))
                .route("/refresh", web::post().to(refresh_session))
                .route("/logout", web::post().to(logout)),
        )
        .service(
            web::scope("")
                .wrap(AuthGateway)
                .route("/me", web::get().to(me)),
        );
}
