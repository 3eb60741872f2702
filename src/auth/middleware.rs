use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Bearer-token guard for the `/auth` and `/projects` scopes.
///
/// Login and register are exempt. The refresh route only accepts tokens
/// marked refresh-capable; every other guarded route only accepts access
/// tokens. Verified claims are stashed in request extensions for the
/// [`crate::auth::extractors::AuthenticatedUser`] extractor.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path();

        // The only unauthenticated endpoints under the guarded scopes.
        if path == "/auth/login" || path == "/auth/register" {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let tokens = match req.app_data::<web::Data<TokenService>>() {
            Some(tokens) => tokens.clone(),
            None => {
                let err = AppError::Internal("Token service not configured".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let claims = match bearer {
            Some(token) => match tokens.verify(token) {
                Ok(claims) => claims,
                Err(app_err) => return Box::pin(async move { Err(app_err.into()) }),
            },
            None => {
                let err = AppError::InvalidToken("Missing token".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        // Refresh tokens are valid only on the refresh route, and vice versa.
        let wants_refresh = path == "/auth/refresh";
        if claims.refresh != wants_refresh {
            let err = if wants_refresh {
                AppError::InvalidToken("Refresh token required".into())
            } else {
                AppError::InvalidToken("Access token required".into())
            };
            return Box::pin(async move { Err(err.into()) });
        }

        req.extensions_mut().insert(claims);
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
