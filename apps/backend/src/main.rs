use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use trivia_backend::config::db::DbKind;
use trivia_backend::infra::state::build_state;
use trivia_backend::middleware::cors::cors_middleware;
use trivia_backend::middleware::request_trace::RequestTrace;
use trivia_backend::middleware::structured_logger::StructuredLogger;
use trivia_backend::middleware::trace_span::TraceSpan;
use trivia_backend::routes;
use trivia_backend::state::security_config::SecurityConfig;
use trivia_backend::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let security_config = match SecurityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid security configuration");
            std::process::exit(1);
        }
    };

    let db_kind = match std::env::var("DB_KIND")
        .map(|raw| raw.parse::<DbKind>())
        .unwrap_or(Ok(DbKind::Postgres))
    {
        Ok(kind) => kind,
        Err(e) => {
            error!(error = %e, "invalid DB_KIND");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db(db_kind)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %host, port, db_kind = ?db_kind, "starting trivia backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
