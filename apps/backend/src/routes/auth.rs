use std::time::SystemTime;

use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::cookies::{cleared_cookies, session_cookies, REFRESH_COOKIE};
use crate::auth::jwt::{self, TokenKind};
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::ValidatedJson;
use crate::repos::users::User;
use crate::services::UserService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for SessionUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            is_admin: u.is_admin,
        }
    }
}

/// Issue a fresh pair for `user` and answer with the session cookies set.
fn start_session(
    mut builder: HttpResponseBuilder,
    user: User,
    state: &AppState,
) -> Result<HttpResponse, AppError> {
    let pair = jwt::issue_pair(user.id, SystemTime::now(), &state.security)?;
    for cookie in session_cookies(pair, &state.security) {
        builder.cookie(cookie);
    }
    Ok(builder.json(SessionUser::from(user)))
}

async fn register(
    http_req: HttpRequest,
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            UserService::new()
                .register(txn, &body.name, &body.email, &body.password)
                .await
        })
    })
    .await?;

    start_session(HttpResponse::Created(), user, &app_state)
}

async fn login(
    http_req: HttpRequest,
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            UserService::new()
                .login(txn, &body.email, &body.password)
                .await
        })
    })
    .await?;

    start_session(HttpResponse::Ok(), user, &app_state)
}

async fn logout(app_state: web::Data<AppState>) -> HttpResponse {
    let mut builder = HttpResponse::NoContent();
    for cookie in cleared_cookies(&app_state.security) {
        builder.cookie(cookie);
    }
    builder.finish()
}

/// Trade a valid refresh cookie for a new pair. The user must still exist.
async fn refresh(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = http_req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized(ErrorCode::UnauthorizedMissingToken, "Missing refresh token")
        })?;
    let claims = jwt::verify(&token, TokenKind::Refresh, &app_state.security)?;

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { UserService::new().me(txn, claims.sub).await })
    })
    .await
    .map_err(|e| match e {
        AppError::NotFound { .. } => {
            AppError::unauthorized(ErrorCode::UnauthorizedInvalidToken, "Unknown session user")
        }
        other => other,
    })?;

    start_session(HttpResponse::Ok(), user, &app_state)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/refresh", web::post().to(refresh));
}
