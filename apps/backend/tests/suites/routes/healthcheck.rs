use actix_web::test;
use serde_json::Value;
use trivia_backend::infra::state::build_state;
use trivia_backend::AppError;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn health_reports_database_and_migrations() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body["migrations_applied"].as_u64().unwrap_or(0) >= 1);
    Ok(())
}

#[actix_web::test]
async fn health_without_database_still_answers() -> Result<(), AppError> {
    let state = build_state().build().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["db"], "unavailable");
    Ok(())
}
