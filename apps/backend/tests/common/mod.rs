#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use backend_test_support::problem_details::{assert_problem_details_from_parts, ProblemDetailsLike};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Consume `resp` and assert it is a problem+json error with `code`.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        actix_web::http::StatusCode::from_u16(expected_status).expect("valid status"),
        expected_code,
        expected_detail_contains,
    )
}
