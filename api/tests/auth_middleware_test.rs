//! Tests for the bearer-token gateway guarding protected routes.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, App};

use tg_api::app::configure_app;
use tg_api::dto::{ErrorBody, PrincipalResponse};
use tg_core::domain::entities::Principal;
use tg_core::services::token::{RotationService, TokenCodec, TokenConfig};
use tg_core::stores::MockSessionStore;

fn codec() -> TokenCodec {
    let config = TokenConfig::new("access-secret-for-tests", "refresh-secret-for-tests");
    TokenCodec::new(config)
}

fn rotation_service() -> Arc<RotationService> {
    Arc::new(RotationService::new(
        Arc::new(MockSessionStore::new()),
        codec(),
    ))
}

fn me_request(header: Option<&str>) -> test::TestRequest {
    let req = test::TestRequest::get().uri("/me");
    match header {
        Some(value) => req.insert_header(("Authorization", value)),
        None => req,
    }
}

#[actix_web::test]
async fn test_missing_authorization_header_is_rejected() {
    let sessions = rotation_service();
    let app = test::init_service(
        App::new().configure(|cfg| configure_app(cfg, sessions.clone())),
    )
    .await;

    let resp = test::call_service(&app, me_request(None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "Unauthorized");
}

#[actix_web::test]
async fn test_malformed_bearer_token_is_rejected() {
    let sessions = rotation_service();
    let app = test::init_service(
        App::new().configure(|cfg| configure_app(cfg, sessions.clone())),
    )
    .await;

    for header in ["Bearer not-a-token", "Basic dXNlcjpwYXNz", "Bearer "] {
        let resp = test::call_service(&app, me_request(Some(header)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {header:?}");
    }
}

#[actix_web::test]
async fn test_valid_access_token_reaches_protected_route() {
    let sessions = rotation_service();
    let app = test::init_service(
        App::new().configure(|cfg| configure_app(cfg, sessions.clone())),
    )
    .await;

    let principal = Principal::new(7, "worker@example.com");
    let access = codec().issue_access(&principal).unwrap();

    let header = format!("Bearer {access}");
    let resp = test::call_service(&app, me_request(Some(&header)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: PrincipalResponse = test::read_body_json(resp).await;
    assert_eq!(body.principal_id, 7);
    assert_eq!(body.email, "worker@example.com");
}

#[actix_web::test]
async fn test_refresh_token_cannot_pass_the_gateway() {
    let sessions = rotation_service();
    let app = test::init_service(
        App::new().configure(|cfg| configure_app(cfg, sessions.clone())),
    )
    .await;

    let principal = Principal::new(7, "worker@example.com");
    let refresh = codec().issue_refresh(&principal, None).unwrap();

    let header = format!("Bearer {refresh}");
    let resp = test::call_service(&app, me_request(Some(&header)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expired_access_token_is_rejected() {
    let sessions = rotation_service();
    let app = test::init_service(
        App::new().configure(|cfg| configure_app(cfg, sessions.clone())),
    )
    .await;

    let expired_codec = TokenCodec::new(
        TokenConfig::new("access-secret-for-tests", "refresh-secret-for-tests")
            .with_access_ttl_minutes(-1),
    );
    let principal = Principal::new(7, "worker@example.com");
    let access = expired_codec.issue_access(&principal).unwrap();

    let header = format!("Bearer {access}");
    let resp = test::call_service(&app, me_request(Some(&header)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
