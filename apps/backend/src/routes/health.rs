use actix_web::{web, HttpResponse};
use migration::count_applied_migrations;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::repos::reader::to_millis;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations_applied: Option<usize>,
    time: i64,
}

/// Liveness plus a best-effort database probe. Always 200 while the
/// process is serving.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = to_millis(OffsetDateTime::now_utc());

    let (db, db_error, migrations_applied) = match require_db(&app_state) {
        Ok(conn) => match conn.execute_unprepared("SELECT 1").await {
            Ok(_) => ("ok", None, count_applied_migrations(conn).await.ok()),
            Err(e) => ("error", Some(format!("DB query failed: {e}")), None),
        },
        Err(_) => ("unavailable", None, None),
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        db,
        db_error,
        migrations_applied,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(health));
}
