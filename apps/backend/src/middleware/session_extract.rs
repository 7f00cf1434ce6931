//! Session extraction middleware for the authenticated API scope.
//!
//! Reads the access token from the `access_token` cookie, falling back to
//! `Authorization: Bearer`, verifies it and stores the `Claims` in request
//! extensions. Missing or invalid tokens are answered with a 401 problem
//! response before the handler runs.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::cookies::ACCESS_COOKIE;
use crate::auth::jwt::{self, TokenKind};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

pub struct SessionExtract;

impl<S, B> Transform<S, ServiceRequest> for SessionExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionExtractMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionExtractMiddleware<S> {
    service: Rc<S>,
}

/// Token from the session cookie, else from a Bearer header.
fn session_token(req: &ServiceRequest) -> Result<Option<String>, AppError> {
    if let Some(cookie) = req.cookie(ACCESS_COOKIE) {
        if !cookie.value().is_empty() {
            return Ok(Some(cookie.value().to_string()));
        }
    }

    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let invalid = || {
        AppError::unauthorized(
            ErrorCode::UnauthorizedInvalidToken,
            "Missing or invalid Bearer token",
        )
    };
    let raw = value.to_str().map_err(|_| invalid())?;
    match raw.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(invalid()),
    }
}

impl<S, B> Service<ServiceRequest> for SessionExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let verified = match (session_token(&req), req.app_data::<web::Data<AppState>>()) {
                (_, None) => Err(AppError::internal("AppState not available")),
                (Err(e), _) => Err(e),
                (Ok(None), _) => Err(AppError::unauthorized(
                    ErrorCode::UnauthorizedMissingToken,
                    "Missing session token",
                )),
                (Ok(Some(token)), Some(state)) => {
                    jwt::verify(&token, TokenKind::Access, &state.security)
                }
            };

            match verified {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}
