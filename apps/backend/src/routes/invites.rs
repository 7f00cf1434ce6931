use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::txn::with_txn;
use crate::entities::InviteStatus;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::InviteService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<InviteStatus>,
}

async fn list_invites(
    http_req: HttpRequest,
    user: CurrentUser,
    params: web::Query<ListParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let status = params.status;
    let invites = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { InviteService::new().list(txn, user.id, status).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(invites))
}

async fn accept_invite(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let invite_id = path.into_inner();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { InviteService::new().accept(txn, user.id, invite_id).await })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn decline_invite(
    http_req: HttpRequest,
    user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let invite_id = path.into_inner();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { InviteService::new().decline(txn, user.id, invite_id).await })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_invites))
        .route("/{invite_id}/accept", web::post().to(accept_invite))
        .route("/{invite_id}/decline", web::post().to(decline_invite));
}
