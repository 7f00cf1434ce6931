use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::txn::with_txn;
use crate::domain::client::GameClient;
use crate::domain::filter::GameFilter;
use crate::domain::pagination::{PageParams, PageRequest};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::GameService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    pub value: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRequest {
    pub winner_id: Uuid,
}

/// Resolve `filter`/`value` against the caller.
///
/// No filter means the caller's active games. User-scoped filters without a
/// value default to the caller.
fn resolve_filter(params: &ListParams, caller: Uuid) -> Result<GameFilter, AppError> {
    let kind = params.filter.as_deref().unwrap_or("user");
    let value = params.value.as_deref().filter(|v| !v.trim().is_empty());
    match (kind, value) {
        ("user" | "user_finished" | "creator_id", None) => {
            GameFilter::parse(kind, Some(&caller.to_string()))
        }
        _ => GameFilter::parse(kind, value),
    }
}

async fn list_games(
    http_req: HttpRequest,
    user: CurrentUser,
    params: web::Query<ListParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let filter = resolve_filter(&params, user.id)?;
    let page = PageRequest::parse(PageParams {
        offset: params.offset,
        limit: params.limit,
        query: params.query,
    })?;

    let result = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { GameService::new().list(txn, filter, &page).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_game(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<GameClient>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let client = body.into_inner();
    let created = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { GameService::new().create(txn, user.id, client).await })
    })
    .await?;
    Ok(HttpResponse::Created().json(created))
}

async fn get_game(
    http_req: HttpRequest,
    _user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let game = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { GameService::new().get(txn, game_id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(game))
}

async fn update_game(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: ValidatedJson<GameClient>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let client = body.into_inner();
    let updated = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { GameService::new().update(txn, user.id, game_id, client).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn finish_game(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<FinishRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();
    let winner_id = body.winner_id;
    let finished = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            GameService::new()
                .finish(txn, user.id, game_id, winner_id)
                .await
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(finished))
}

async fn add_user(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (game_id, user_id) = path.into_inner();
    let game = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            GameService::new()
                .add_user(txn, user.id, game_id, user_id)
                .await
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(game))
}

async fn remove_user(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (game_id, user_id) = path.into_inner();
    let game = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            GameService::new()
                .remove_user(txn, user.id, game_id, user_id)
                .await
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(game))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_games))
        .route("", web::post().to(create_game))
        .route("/{game_id}", web::get().to(get_game))
        .route("/{game_id}", web::put().to(update_game))
        .route("/{game_id}/finish", web::post().to(finish_game))
        .route("/{game_id}/users/{user_id}", web::post().to(add_user))
        .route("/{game_id}/users/{user_id}", web::delete().to(remove_user));
}
