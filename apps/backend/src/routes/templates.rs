use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::txn::with_txn;
use crate::domain::client::GameTemplateClient;
use crate::domain::filter::TemplateFilter;
use crate::domain::pagination::{PageParams, PageRequest};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::TemplateService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub invitees: Vec<Uuid>,
}

async fn list_templates(
    http_req: HttpRequest,
    user: CurrentUser,
    params: web::Query<ListParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let filter = TemplateFilter::parse(params.filter.as_deref(), user.id)?;
    let page = PageRequest::parse(PageParams {
        offset: params.offset,
        limit: params.limit,
        query: params.query,
    })?;

    let result = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { TemplateService::new().list(txn, filter, &page).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_template(
    http_req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<GameTemplateClient>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let client = body.into_inner();
    let created = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { TemplateService::new().create(txn, user.id, client).await })
    })
    .await?;
    Ok(HttpResponse::Created().json(created))
}

async fn get_template(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let template_id = path.into_inner();
    let template = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { TemplateService::new().get(txn, user.id, template_id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(template))
}

async fn update_template(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: ValidatedJson<GameTemplateClient>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let template_id = path.into_inner();
    let client = body.into_inner();
    let updated = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            TemplateService::new()
                .update(txn, user.id, template_id, client)
                .await
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_template(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let template_id = path.into_inner();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { TemplateService::new().delete(txn, user.id, template_id).await })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn create_game_from_template(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let template_id = path.into_inner();
    let CreateGameRequest { name, invitees } = body.into_inner();
    let game = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            TemplateService::new()
                .create_game(txn, user.id, template_id, name, &invitees)
                .await
        })
    })
    .await?;
    Ok(HttpResponse::Created().json(game))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_templates))
        .route("", web::post().to(create_template))
        .route("/{template_id}", web::get().to(get_template))
        .route("/{template_id}", web::put().to(update_template))
        .route("/{template_id}", web::delete().to(delete_template))
        .route("/{template_id}/games", web::post().to(create_game_from_template));
}
