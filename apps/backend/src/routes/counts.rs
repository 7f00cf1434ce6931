use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::CountService;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct CountResponse {
    count: u64,
}

async fn my_counts(
    http_req: HttpRequest,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let counts = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { CountService::new().mine(txn, user.id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(counts))
}

async fn public_templates(
    http_req: HttpRequest,
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let count = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { CountService::new().public_templates(txn).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(my_counts))
        .route("/public-templates", web::get().to(public_templates));
}
