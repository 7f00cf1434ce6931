use actix_web::test;
use serde_json::{json, Value};
use trivia_backend::db::txn::with_txn;
use trivia_backend::AppError;

use crate::common::assert_problem;
use crate::support::factory::{bearer_for, seed_user, template_client};
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn template_to_finished_game_over_http() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (host, guest) = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let guest = seed_user(txn, "guest").await?;
            Ok::<_, AppError>((host, guest))
        })
    })
    .await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let host_auth = ("Authorization", bearer_for(host.id));
    let guest_auth = ("Authorization", bearer_for(guest.id));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/templates")
            .insert_header(host_auth.clone())
            .set_json(template_client("Pub quiz", true))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 201);
    let template: Value = test::read_body_json(resp).await;
    assert_eq!(template["creatorId"], json!(host.id));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/templates/{}/games", template["id"].as_str().unwrap_or_default()))
            .insert_header(host_auth.clone())
            .set_json(json!({ "name": "Pub quiz #1", "invitees": [guest.id] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 201);
    let game: Value = test::read_body_json(resp).await;
    let game_id = game["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(game["unconfirmedUsers"][0]["status"], "pending");

    let invites: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/invites?status=pending")
            .insert_header(guest_auth.clone())
            .to_request(),
    )
    .await;
    let invite_id = invites[0]["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(invites[0]["gameId"], game["id"]);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/invites/{invite_id}/accept"))
            .insert_header(guest_auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 204);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{game_id}/finish"))
            .insert_header(guest_auth.clone())
            .set_json(json!({ "winnerId": guest.id }))
            .to_request(),
    )
    .await;
    assert_problem(resp, 403, "FORBIDDEN", None).await;

    let finished: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{game_id}/finish"))
            .insert_header(host_auth.clone())
            .set_json(json!({ "winnerId": guest.id }))
            .to_request(),
    )
    .await;
    assert_eq!(finished["isFinished"], true);
    assert_eq!(finished["winner"]["id"], json!(guest.id));

    let history: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/games?filter=user_finished")
            .insert_header(guest_auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(history["total"], 1);
    assert_eq!(history["data"][0]["id"], game["id"]);

    let counts: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/counts/me")
            .insert_header(guest_auth)
            .to_request(),
    )
    .await;
    assert_eq!(counts["gamesCount"], 0);
    assert_eq!(counts["historyGamesCount"], 1);

    let public: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/counts/public-templates")
            .insert_header(host_auth)
            .to_request(),
    )
    .await;
    assert!(public["count"].as_u64().unwrap_or(0) >= 1);
    Ok(())
}

#[actix_web::test]
async fn finished_games_reject_updates_over_http() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let host = with_txn(None, &state, |txn| {
        Box::pin(async move { seed_user(txn, "host").await })
    })
    .await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let auth = ("Authorization", bearer_for(host.id));

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/games")
            .insert_header(auth.clone())
            .set_json(json!({ "name": "Solo", "rounds": [] }))
            .to_request(),
    )
    .await;
    let game_id = created["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["users"][0]["isAdmin"], true);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/games/{game_id}/finish"))
            .insert_header(auth.clone())
            .set_json(json!({ "winnerId": host.id }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);

    let mut update = created.clone();
    update["name"] = json!("Renamed");
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/games/{game_id}"))
            .insert_header(auth)
            .set_json(update)
            .to_request(),
    )
    .await;
    assert_problem(resp, 409, "GAME_ALREADY_FINISHED", None).await;
    Ok(())
}
