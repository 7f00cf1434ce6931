use backend_test_support::unique_helpers::unique_name;
use time::OffsetDateTime;
use trivia_backend::db::txn::with_txn;
use trivia_backend::domain::client::{AnsweredByClient, UserClient};
use trivia_backend::domain::filter::GameFilter;
use trivia_backend::domain::pagination::PageRequest;
use trivia_backend::entities::InviteStatus;
use trivia_backend::mappers::to_create_game;
use trivia_backend::repos::writer;
use trivia_backend::services::{CountService, GameService, TemplateService};
use trivia_backend::{AppError, ErrorCode};
use uuid::Uuid;

use crate::support::build_test_state;
use crate::support::factory::{game_client, seed_user, template_client};

#[tokio::test]
async fn game_from_template_copies_tree_with_fresh_ids() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let guest = seed_user(txn, "guest").await?;
            let templates = TemplateService::new();
            let template = templates
                .create(txn, host.id, template_client("Friday", true))
                .await?;

            let game = templates
                .create_game(txn, host.id, template.id, Some("Friday #1".into()), &[guest.id])
                .await?;

            assert_eq!(game.name, "Friday #1");
            assert_eq!(game.template_id, Some(template.id));
            assert_eq!(game.creator_id, host.id);
            assert!(!game.is_finished);
            assert_eq!(game.rounds.len(), template.rounds.len());
            assert_ne!(game.rounds[0].id, template.rounds[0].id);
            assert_eq!(game.rounds[0].themes[0].name, template.rounds[0].themes[0].name);
            assert_eq!(game.current_round, Some(game.rounds[0].id));

            assert_eq!(game.users.len(), 1);
            assert_eq!(game.users[0].id, host.id);
            assert!(game.users[0].is_admin);

            assert_eq!(game.unconfirmed_users.len(), 1);
            assert_eq!(game.unconfirmed_users[0].id, guest.id);
            assert_eq!(game.unconfirmed_users[0].status, InviteStatus::Pending);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn answers_upsert_per_question_and_user() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let service = GameService::new();
            let mut game = service.create(txn, host.id, game_client("Answers", &[])).await?;

            let round_id = game.rounds[0].id;
            let question_id = game.rounds[0].themes[0].questions[0].id;
            game.rounds[0].themes[0].questions[0].answered_by.insert(
                host.id,
                AnsweredByClient {
                    is_correct: true,
                    time_answered: 4,
                },
            );
            game.users[0].round_score.insert(round_id, 100);
            game.current_question = Some(question_id);
            game.current_user = Some(host.id);

            service.update(txn, host.id, game.id, game.clone()).await?;

            game.rounds[0].themes[0].questions[0].answered_by.insert(
                host.id,
                AnsweredByClient {
                    is_correct: false,
                    time_answered: 9,
                },
            );
            game.users[0].round_score.insert(round_id, -100);
            let updated = service.update(txn, host.id, game.id, game.clone()).await?;

            let answered = &updated.rounds[0].themes[0].questions[0].answered_by;
            assert_eq!(answered.len(), 1);
            assert_eq!(
                answered.get(&host.id),
                Some(&AnsweredByClient {
                    is_correct: false,
                    time_answered: 9
                })
            );
            assert_eq!(updated.users[0].round_score.get(&round_id), Some(&-100));
            assert_eq!(updated.current_question, Some(question_id));
            assert_eq!(updated.current_user, Some(host.id));

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn answers_from_non_members_are_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let outsider = seed_user(txn, "outsider").await?;
            let service = GameService::new();
            let mut game = service.create(txn, host.id, game_client("Closed", &[])).await?;

            game.rounds[0].themes[0].questions[0].answered_by.insert(
                outsider.id,
                AnsweredByClient {
                    is_correct: true,
                    time_answered: 1,
                },
            );
            let err = service
                .update(txn, host.id, game.id, game.clone())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);

            let err = service
                .update(txn, outsider.id, game.id, game)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::Forbidden);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn finishing_is_one_way() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let service = GameService::new();
            let game = service.create(txn, host.id, game_client("Final", &[])).await?;

            let finished = service.finish(txn, host.id, game.id, host.id).await?;
            assert!(finished.is_finished);
            assert!(finished.finish_date.is_some());
            let winner = finished.winner.clone().expect("winner set");
            assert_eq!(winner.id, host.id);
            assert_eq!(winner.name, host.name);

            let err = service
                .finish(txn, host.id, game.id, host.id)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::GameAlreadyFinished);

            let mut renamed = finished.clone();
            renamed.name = "Too late".into();
            let err = service
                .update(txn, host.id, game.id, renamed)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::GameAlreadyFinished);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn finishing_through_update_requires_a_winner() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let service = GameService::new();
            let game = service.create(txn, host.id, game_client("No winner", &[])).await?;

            let mut unresolved = game.clone();
            unresolved.is_finished = true;
            unresolved.winner = None;
            let err = service
                .update(txn, host.id, game.id, unresolved)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);

            let still_open = service.get(txn, game.id).await?;
            assert!(!still_open.is_finished);
            assert!(still_open.winner.is_none());
            assert!(still_open.finish_date.is_none());

            let mut resolved = game.clone();
            resolved.is_finished = true;
            resolved.winner = Some(UserClient {
                id: host.id,
                name: host.name.clone(),
            });
            let finished = service.update(txn, host.id, game.id, resolved).await?;
            assert!(finished.is_finished);
            assert_eq!(finished.winner.map(|w| w.id), Some(host.id));
            assert!(finished.finish_date.is_some());

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn winner_must_be_a_member() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let invited = seed_user(txn, "invited").await?;
            let service = GameService::new();
            let game = service
                .create(txn, host.id, game_client("Pending win", &[invited.id]))
                .await?;

            let err = service
                .finish(txn, host.id, game.id, invited.id)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);

            let err = service
                .finish(txn, invited.id, game.id, host.id)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::Forbidden);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn user_filters_split_active_and_finished() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let service = GameService::new();
            let page = PageRequest::default();

            let first = service.create(txn, host.id, game_client("One", &[])).await?;
            service.create(txn, host.id, game_client("Two", &[])).await?;
            service.finish(txn, host.id, first.id, host.id).await?;

            let active = service.list(txn, GameFilter::User(host.id), &page).await?;
            assert_eq!(active.total, 1);
            assert_eq!(active.data[0].name, "Two");

            let history = service
                .list(txn, GameFilter::UserFinished(host.id), &page)
                .await?;
            assert_eq!(history.total, 1);
            assert_eq!(history.data[0].id, first.id);

            let by_id = service.list(txn, GameFilter::Id(first.id), &page).await?;
            assert_eq!(by_id.data.len(), 1);

            let counts = CountService::new().mine(txn, host.id).await?;
            assert_eq!((counts.games_count, counts.history_games_count), (1, 1));
            assert_eq!(counts.templates_count, 0);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn public_and_all_filters() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let templates = TemplateService::new();
            let games = GameService::new();
            let tag = unique_name("pub");

            let public = templates
                .create(txn, host.id, template_client("Open", true))
                .await?;
            let private = templates
                .create(txn, host.id, template_client("Closed", false))
                .await?;

            let open = templates
                .create_game(txn, host.id, public.id, Some(format!("{tag} open")), &[])
                .await?;
            let done = templates
                .create_game(txn, host.id, public.id, Some(format!("{tag} done")), &[])
                .await?;
            games.finish(txn, host.id, done.id, host.id).await?;
            templates
                .create_game(txn, host.id, private.id, Some(format!("{tag} private")), &[])
                .await?;
            games
                .create(txn, host.id, game_client(&format!("{tag} raw"), &[]))
                .await?;

            let page = PageRequest::default().with_query(tag);

            let all = games.list(txn, GameFilter::All, &page).await?;
            assert_eq!(all.total, 4);

            let unfinished = games.list(txn, GameFilter::PublicUnfinished, &page).await?;
            assert_eq!(unfinished.total, 1);
            assert_eq!(unfinished.data[0].id, open.id);

            let finished = games.list(txn, GameFilter::PublicFinished, &page).await?;
            assert_eq!(finished.total, 1);
            assert_eq!(finished.data[0].id, done.id);
            assert!(finished.data[0].is_finished);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn misfiled_game_theme_leaves_nothing_behind() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let game_id = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let client = game_client("Broken", &[]);
            let now = OffsetDateTime::now_utc();
            let mut rows = to_create_game(&client, host.id, now);

            let mut stray = rows.themes_by_round.values().next().cloned().expect("a theme");
            stray.id = Uuid::new_v4();
            stray.round_id = Uuid::new_v4();
            rows.themes_by_round.push(client.rounds[0].id, stray);

            let err = writer::create_game(txn, rows, now).await.unwrap_err();
            assert!(err.detail().contains("has incorrect round ID"));
            Ok::<_, AppError>(client.id)
        })
    })
    .await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let err = GameService::new().get(txn, game_id).await.unwrap_err();
            Ok::<_, AppError>(err)
        })
    })
    .await?;
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    Ok(())
}

#[tokio::test]
async fn missing_game_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let err = GameService::new()
                .get(txn, Uuid::new_v4())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::GameNotFound);
            Ok::<_, AppError>(())
        })
    })
    .await
}
