use actix_web::{error, web};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::middleware::SessionExtract;

pub mod auth;
pub mod counts;
pub mod games;
pub mod health;
pub mod invites;
pub mod templates;
pub mod users;

/// Register every route plus problem+json handlers for path/query errors.
///
/// `/health` and `/api/auth/*` are public; everything else under `/api`
/// runs behind `SessionExtract`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid path: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid query: {err}")).into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid JSON: {err}")).into()
    }));

    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(
        web::scope("/api")
            .wrap(SessionExtract)
            .service(web::scope("/users").configure(users::configure_routes))
            .service(web::scope("/templates").configure(templates::configure_routes))
            .service(web::scope("/games").configure(games::configure_routes))
            .service(web::scope("/invites").configure(invites::configure_routes))
            .service(web::scope("/counts").configure(counts::configure_routes)),
    );
}
