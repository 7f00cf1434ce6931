use backend_test_support::unique_helpers::unique_name;
use time::OffsetDateTime;
use serde_json::json;
use trivia_backend::db::txn::with_txn;
use trivia_backend::domain::client::GameTemplateClient;
use trivia_backend::domain::filter::TemplateFilter;
use trivia_backend::domain::grouped::Grouped;
use trivia_backend::domain::pagination::PageRequest;
use trivia_backend::mappers::to_create_template;
use trivia_backend::repos::{templates, writer};
use trivia_backend::services::{GameService, TemplateService};
use trivia_backend::{AppError, ErrorCode};
use uuid::Uuid;

use crate::support::build_test_state;
use crate::support::factory::{question, seed_user, template_client, theme};

#[tokio::test]
async fn create_then_fetch_returns_the_same_tree() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            let client = template_client("Quiz night", true);
            let service = TemplateService::new();

            let created = service.create(txn, author.id, client.clone()).await?;
            let fetched = service.get(txn, author.id, client.id).await?;

            assert_eq!(created, fetched);
            assert_eq!(fetched.id, client.id);
            assert_eq!(fetched.creator_id, author.id);
            assert_eq!(fetched.description, client.description);

            let round_names: Vec<_> = fetched.rounds.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(round_names, vec!["Round 1", "Round 2"]);

            let first = &fetched.rounds[0];
            assert_eq!(first.id, client.rounds[0].id);
            assert_eq!(first.time.label, "30s");
            assert_eq!(first.ranks.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);

            let theme_names: Vec<_> = first.themes.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(theme_names, vec!["Science", "History"]);
            assert_eq!(first.themes[0].questions, client.rounds[0].themes[0].questions);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn update_follows_payload_order_and_drops_missing_children() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            let service = TemplateService::new();
            let mut client = service
                .create(txn, author.id, template_client("Reorder", false))
                .await?;

            let dropped_round = client.rounds.pop().expect("two rounds");
            client.rounds[0].themes.swap(0, 1);
            client.rounds[0].themes[0].questions.push(question("h300", 300));
            client.name = "Reordered".into();

            let updated = service.update(txn, author.id, client.id, client.clone()).await?;

            assert_eq!(updated.name, "Reordered");
            assert_eq!(updated.rounds.len(), 1);
            assert!(updated.rounds.iter().all(|r| r.id != dropped_round.id));

            let themes = &updated.rounds[0].themes;
            assert_eq!(
                themes.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
                vec!["History", "Science"]
            );
            assert_eq!(
                themes[0].questions.iter().map(|q| q.text.as_str()).collect::<Vec<_>>(),
                vec!["h100", "h200", "h300"]
            );

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn stored_theme_positions_drive_read_order() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            let mut client = template_client("Shuffled", false);
            client.rounds[0]
                .themes
                .push(theme("Art", vec![question("a100", 100)]));
            let round_id = client.rounds[0].id;

            let mut rows = to_create_template(&client, author.id, OffsetDateTime::now_utc());
            let mut shuffled = [2, 0, 1].into_iter();
            rows.themes_by_round = rows
                .themes_by_round
                .values()
                .cloned()
                .map(|mut t| {
                    if t.round_id == round_id {
                        t.position = shuffled.next().expect("three themes");
                    }
                    (t.round_id, t)
                })
                .collect::<Grouped<_, _>>();

            writer::create_template(txn, rows).await?;
            let fetched = TemplateService::new().get(txn, author.id, client.id).await?;

            let names: Vec<_> = fetched.rounds[0].themes.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["History", "Art", "Science"]);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn nil_ids_get_fresh_values_on_every_create() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            let service = TemplateService::new();
            let payload = json!({
                "id": Uuid::nil(),
                "name": "Blank ids",
                "rounds": [{ "id": Uuid::nil(), "name": "Round 1" }]
            });

            let first: GameTemplateClient =
                serde_json::from_value(payload.clone()).expect("valid payload");
            let second: GameTemplateClient =
                serde_json::from_value(payload).expect("valid payload");
            let first = service.create(txn, author.id, first).await?;
            let second = service.create(txn, author.id, second).await?;

            assert!(!first.id.is_nil());
            assert!(!first.rounds[0].id.is_nil());
            assert_ne!(first.id, second.id);
            assert_ne!(first.rounds[0].id, second.rounds[0].id);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn misfiled_theme_is_rejected_before_anything_is_written() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let template_id = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            let client = template_client("Broken", false);
            let mut rows = to_create_template(&client, author.id, OffsetDateTime::now_utc());

            let mut stray = rows.themes_by_round.values().next().cloned().expect("a theme");
            stray.id = Uuid::new_v4();
            stray.round_id = Uuid::new_v4();
            rows.themes_by_round.push(client.rounds[0].id, stray);

            let err = writer::create_template(txn, rows).await.unwrap_err();
            assert!(err.detail().contains("has incorrect round ID"));
            Ok::<_, AppError>(client.id)
        })
    })
    .await?;

    let found = with_txn(None, &state, |txn| {
        Box::pin(async move { Ok::<_, AppError>(templates::find_template(txn, template_id).await?) })
    })
    .await?;
    assert!(found.is_none());
    Ok(())
}

#[tokio::test]
async fn failed_child_insert_rolls_back_the_whole_template() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let (author_id, template_id) = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            Ok::<_, AppError>((author.id, Uuid::new_v4()))
        })
    })
    .await?;

    let result = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let mut client = template_client("Duplicate ids", false);
            client.id = template_id;
            let reused = client.rounds[0].themes[0].questions[0].id;
            client.rounds[0].themes[1].questions[0].id = reused;
            TemplateService::new().create(txn, author_id, client).await
        })
    })
    .await;
    assert!(result.is_err());

    let found = with_txn(None, &state, |txn| {
        Box::pin(async move { Ok::<_, AppError>(templates::find_template(txn, template_id).await?) })
    })
    .await?;
    assert!(found.is_none(), "template root must be rolled back");
    Ok(())
}

#[tokio::test]
async fn update_refuses_rows_owned_by_another_template() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            let service = TemplateService::new();
            let first = service
                .create(txn, author.id, template_client("First", false))
                .await?;
            let mut second = service
                .create(txn, author.id, template_client("Second", false))
                .await?;

            second.rounds[0].id = first.rounds[0].id;
            let err = service
                .update(txn, author.id, second.id, second.clone())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::IntegrityViolation);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn private_templates_are_invisible_and_immutable_to_others() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let owner = seed_user(txn, "owner").await?;
            let stranger = seed_user(txn, "stranger").await?;
            let service = TemplateService::new();

            let private = service
                .create(txn, owner.id, template_client("Secret", false))
                .await?;
            let public = service
                .create(txn, owner.id, template_client("Open", true))
                .await?;

            let err = service.get(txn, stranger.id, private.id).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::TemplateNotFound);

            assert_eq!(service.get(txn, stranger.id, public.id).await?.id, public.id);
            let err = service.delete(txn, stranger.id, public.id).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::Forbidden);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn list_scopes_by_filter_and_pages() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let alice = seed_user(txn, "alice").await?;
            let bob = seed_user(txn, "bob").await?;
            let service = TemplateService::new();
            let tag = unique_name("tpl");

            for (owner, n, public) in [
                (alice.id, 1, true),
                (alice.id, 2, true),
                (alice.id, 3, false),
                (bob.id, 4, false),
            ] {
                service
                    .create(txn, owner, template_client(&format!("{tag} {n}"), public))
                    .await?;
            }

            let page = PageRequest::default().with_query(tag.clone());
            let all_for_bob = service.list(txn, TemplateFilter::All(bob.id), &page).await?;
            assert_eq!(all_for_bob.total, 3);

            let public = service.list(txn, TemplateFilter::Public, &page).await?;
            assert_eq!(public.total, 2);
            assert!(public.data.iter().all(|t| t.is_public));

            let mine = service.list(txn, TemplateFilter::Mine(alice.id), &page).await?;
            assert_eq!(mine.total, 3);

            let window = PageRequest::new(2, 2).with_query(tag.clone());
            let second_page = service
                .list(txn, TemplateFilter::Mine(alice.id), &window)
                .await?;
            assert_eq!((second_page.total, second_page.data.len()), (3, 1));
            assert_eq!((second_page.offset, second_page.limit), (2, 2));

            let past_end = PageRequest::new(10, 5).with_query(tag);
            let empty = service.list(txn, TemplateFilter::Public, &past_end).await?;
            assert!(empty.data.is_empty());
            assert_eq!(empty.total, 2);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn deleting_a_template_keeps_its_games() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let author = seed_user(txn, "author").await?;
            let service = TemplateService::new();
            let template = service
                .create(txn, author.id, template_client("Short lived", false))
                .await?;
            let game = service
                .create_game(txn, author.id, template.id, None, &[])
                .await?;
            assert_eq!(game.template_id, Some(template.id));

            service.delete(txn, author.id, template.id).await?;

            let err = service.get(txn, author.id, template.id).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::TemplateNotFound);

            let orphan = GameService::new().get(txn, game.id).await?;
            assert_eq!(orphan.template_id, None);
            assert_eq!(orphan.rounds.len(), template.rounds.len());

            Ok::<_, AppError>(())
        })
    })
    .await
}
