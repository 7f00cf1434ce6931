use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::auth::SessionUser;
use crate::db::txn::with_txn;
use crate::domain::client::UserClient;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::CurrentUser;
use crate::services::UserService;
use crate::state::app_state::AppState;

const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MAX_SEARCH_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
}

async fn me(
    http_req: HttpRequest,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let found = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { UserService::new().me(txn, user.id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(SessionUser::from(found)))
}

/// Name search. A blank `search` matches nobody.
async fn search(
    http_req: HttpRequest,
    _user: CurrentUser,
    params: web::Query<SearchParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(AppError::invalid(
            ErrorCode::InvalidPagination,
            format!("limit must be between 1 and {MAX_SEARCH_LIMIT}, got {limit}"),
        ));
    }
    let Some(query) = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(HttpResponse::Ok().json(Vec::<UserClient>::new()));
    };

    let found = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { UserService::new().search(txn, &query, limit as u64).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(found))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(search))
        .route("/me", web::get().to(me));
}
