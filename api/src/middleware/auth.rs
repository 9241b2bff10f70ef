//! Authentication gateway: bearer-token verification middleware.
//!
//! Reads the `Authorization: Bearer` header, verifies the access token
//! locally (no store lookup: access tokens are stateless), and attaches the
//! verified [`Principal`] to request extensions for downstream handlers.
//! Every failure short-circuits with one uniform 401 body; the response never
//! reveals which validation step failed.

use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use tg_core::domain::{Principal, TokenType};
use tg_core::services::token::TokenCodec;

use crate::dto::ErrorBody;

/// The verified principal of an authenticated request.
///
/// Flows as an explicit extractor value, never through globals: handlers that
/// need the identity take `AuthPrincipal` as an argument.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

/// Authentication gateway middleware factory.
///
/// Expects a [`TokenCodec`] registered as `web::Data<TokenCodec>` on the app.
pub struct AuthGateway;

impl<S, B> Transform<S, ServiceRequest> for AuthGateway
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGatewayMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGatewayMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGatewayMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGatewayMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let verified = verify_request(&req);

            match verified {
                Ok(principal) => {
                    req.extensions_mut().insert(AuthPrincipal(principal));
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(reason) => {
                    // Logged with the reason; the response body stays uniform.
                    debug!(reason, "request rejected by authentication gateway");
                    let (req, _) = req.into_parts();
                    let res = unauthorized_response().map_into_right_body();
                    Ok(ServiceResponse::new(req, res))
                }
            }
        })
    }
}

fn verify_request(req: &ServiceRequest) -> Result<Principal, &'static str> {
    let token = extract_bearer_token(req).ok_or("missing bearer token")?;

    let codec = req
        .app_data::<web::Data<TokenCodec>>()
        .ok_or("token codec not configured")?;

    let claims = codec
        .verify(&token, TokenType::Access)
        .map_err(|_| "access token rejected")?;

    claims.principal().map_err(|_| "unusable claims")
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

fn unauthorized_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorBody::new("Unauthorized"))
}

/// Extractor for handlers behind the gateway.
impl FromRequest for AuthPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthPrincipal>()
            .cloned()
            .ok_or_else(|| {
                actix_web::error::InternalError::from_response(
                    "authentication required",
                    unauthorized_response(),
                )
                .into()
            });

        ready(result)
    }
}
