use actix_web::{test, web, HttpResponse};
use serde_json::json;
use trivia_backend::infra::state::build_state;
use trivia_backend::{AppError, ErrorCode};
use uuid::Uuid;

use crate::common::assert_problem;
use crate::support::factory::bearer_for;
use crate::support::{build_test_state, create_test_app};

async fn conflict_endpoint() -> Result<HttpResponse, AppError> {
    Err(AppError::conflict(
        ErrorCode::AlreadyInvited,
        "User already invited to this game",
    ))
}

async fn unavailable_endpoint() -> Result<HttpResponse, AppError> {
    Err(AppError::db_unavailable())
}

// handler-only: validates error shape; no DB
#[actix_web::test]
async fn handler_errors_render_as_problem_details() -> Result<(), AppError> {
    let state = build_state().build().await?;
    let app = create_test_app(state)
        .with_routes(|cfg| {
            cfg.route("/_test/conflict", web::get().to(conflict_endpoint))
                .route("/_test/unavailable", web::get().to(unavailable_endpoint));
        })
        .build()
        .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/_test/conflict").to_request(),
    )
    .await;
    let problem = assert_problem(resp, 409, "ALREADY_INVITED", Some("already invited")).await;
    assert!(problem.type_.ends_with("/ALREADY_INVITED"));
    assert_eq!(problem.title, "Already Invited");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/_test/unavailable").to_request(),
    )
    .await;
    assert_problem(resp, 503, "DB_UNAVAILABLE", None).await;
    Ok(())
}

#[actix_web::test]
async fn request_parsing_errors_are_problem_details() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = ("Authorization", bearer_for(Uuid::new_v4()));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/games/not-a-uuid")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_problem(resp, 400, "BAD_REQUEST", Some("Invalid path")).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/templates")
            .insert_header(auth.clone())
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request(),
    )
    .await;
    assert_problem(resp, 400, "BAD_REQUEST", Some("Invalid JSON")).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/templates")
            .insert_header(auth.clone())
            .set_json(json!({ "name": "" }))
            .to_request(),
    )
    .await;
    assert_problem(resp, 422, "VALIDATION_ERROR", Some("name")).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/games?filter=everything")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_problem(resp, 422, "INVALID_FILTER", Some("everything")).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/templates?limit=0")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_problem(resp, 422, "INVALID_PAGINATION", None).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/games/{}", Uuid::new_v4()))
            .insert_header(auth)
            .to_request(),
    )
    .await;
    assert_problem(resp, 404, "GAME_NOT_FOUND", None).await;
    Ok(())
}
