use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use backend_test_support::unique_helpers::{unique_email, unique_name};
use serde_json::{json, Value};
use trivia_backend::auth::cookies::{ACCESS_COOKIE, REFRESH_COOKIE};
use trivia_backend::AppError;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app};

fn cookie_named(resp: &ServiceResponse, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

fn register_body(email: &str) -> Value {
    json!({
        "name": unique_name("player"),
        "email": email,
        "password": "correct horse battery",
    })
}

#[actix_web::test]
async fn register_sets_session_cookies_that_authenticate() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let email = unique_email("reg");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body(&email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 201);

    let access = cookie_named(&resp, ACCESS_COOKIE).expect("access cookie");
    let refresh = cookie_named(&resp, REFRESH_COOKIE).expect("refresh cookie");
    assert_eq!(access.http_only(), Some(true));
    assert_eq!(refresh.path(), Some("/api/auth/refresh"));

    let registered: Value = test::read_body_json(resp).await;
    assert_eq!(registered["email"], email);

    let me: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me")
            .cookie(access)
            .to_request(),
    )
    .await;
    assert_eq!(me["id"], registered["id"]);
    assert_eq!(me["isAdmin"], false);
    Ok(())
}

#[actix_web::test]
async fn duplicate_email_is_a_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let email = unique_email("dup");

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body(&email))
            .to_request(),
    )
    .await;
    assert_eq!(first.status().as_u16(), 201);

    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body(&email.to_uppercase()))
            .to_request(),
    )
    .await;
    assert_problem(second, 409, "EMAIL_TAKEN", None).await;
    Ok(())
}

#[actix_web::test]
async fn login_checks_the_password() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let email = unique_email("login");

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body(&email))
            .to_request(),
    )
    .await;

    let ok = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": "correct horse battery" }))
            .to_request(),
    )
    .await;
    assert_eq!(ok.status().as_u16(), 200);
    assert!(cookie_named(&ok, ACCESS_COOKIE).is_some());

    let wrong = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": "incorrect horse" }))
            .to_request(),
    )
    .await;
    assert_problem(wrong, 401, "INVALID_CREDENTIALS", None).await;

    let unknown = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": unique_email("nobody"), "password": "whatever1" }))
            .to_request(),
    )
    .await;
    assert_problem(unknown, 401, "INVALID_CREDENTIALS", None).await;
    Ok(())
}

#[actix_web::test]
async fn short_password_fails_validation() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "shorty", "email": unique_email("s"), "password": "123" }))
            .to_request(),
    )
    .await;
    assert_problem(resp, 422, "VALIDATION_ERROR", Some("password")).await;
    Ok(())
}

#[actix_web::test]
async fn refresh_reissues_and_logout_clears() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let registered = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body(&unique_email("refresh")))
            .to_request(),
    )
    .await;
    let refresh = cookie_named(&registered, REFRESH_COOKIE).expect("refresh cookie");
    let access = cookie_named(&registered, ACCESS_COOKIE).expect("access cookie");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/refresh")
            .cookie(refresh)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(cookie_named(&resp, ACCESS_COOKIE).is_some());

    let missing = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/refresh").to_request(),
    )
    .await;
    assert_problem(missing, 401, "UNAUTHORIZED_MISSING_TOKEN", None).await;

    let access_as_refresh = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/refresh")
            .cookie(Cookie::new(REFRESH_COOKIE, access.value().to_string()))
            .to_request(),
    )
    .await;
    assert_problem(access_as_refresh, 401, "UNAUTHORIZED_INVALID_TOKEN", None).await;

    let logout = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/logout").to_request(),
    )
    .await;
    assert_eq!(logout.status().as_u16(), 204);
    let cleared = cookie_named(&logout, ACCESS_COOKIE).expect("cleared cookie");
    assert_eq!(cleared.value(), "");
    Ok(())
}

#[actix_web::test]
async fn protected_routes_require_a_session() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/users/me").to_request(),
    )
    .await;
    assert_problem(resp, 401, "UNAUTHORIZED_MISSING_TOKEN", None).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/games")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_request(),
    )
    .await;
    assert_problem(resp, 401, "UNAUTHORIZED_INVALID_TOKEN", None).await;
    Ok(())
}
