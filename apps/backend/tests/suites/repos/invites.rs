use trivia_backend::db::txn::with_txn;
use trivia_backend::entities::InviteStatus;
use trivia_backend::services::{GameService, InviteService};
use trivia_backend::{AppError, ErrorCode};

use crate::support::build_test_state;
use crate::support::factory::{game_client, seed_user};

#[tokio::test]
async fn accept_joins_the_game_exactly_once() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let guest = seed_user(txn, "guest").await?;
            let games = GameService::new();
            let invites = InviteService::new();
            let game = games
                .create(txn, host.id, game_client("Invites", &[guest.id]))
                .await?;

            let pending = invites.list(txn, guest.id, Some(InviteStatus::Pending)).await?;
            assert_eq!(pending.len(), 1);
            let invite = &pending[0];
            assert_eq!(invite.game_id, game.id);
            assert_eq!(invite.game_name, "Invites");
            assert_eq!(invite.game_creator_name, host.name);

            invites.accept(txn, guest.id, invite.id).await?;

            let joined = games.get(txn, game.id).await?;
            assert!(joined.users.iter().any(|u| u.id == guest.id && !u.is_admin));
            assert!(joined.unconfirmed_users.is_empty());

            let err = invites.accept(txn, guest.id, invite.id).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::InviteNotPending);

            let accepted = invites.list(txn, guest.id, Some(InviteStatus::Accepted)).await?;
            assert_eq!(accepted.len(), 1);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn declined_invites_can_be_reopened_once() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let guest = seed_user(txn, "guest").await?;
            let games = GameService::new();
            let invites = InviteService::new();
            let game = games
                .create(txn, host.id, game_client("Second chance", &[guest.id]))
                .await?;

            let invite_id = invites.list(txn, guest.id, None).await?[0].id;
            invites.decline(txn, guest.id, invite_id).await?;

            let after_decline = games.get(txn, game.id).await?;
            assert_eq!(after_decline.unconfirmed_users[0].status, InviteStatus::Declined);
            assert!(after_decline.users.iter().all(|u| u.id != guest.id));

            games.add_user(txn, host.id, game.id, guest.id).await?;
            let reopened = invites.list(txn, guest.id, Some(InviteStatus::Pending)).await?;
            assert_eq!(reopened.len(), 1);
            assert_eq!(reopened[0].id, invite_id);

            let err = games
                .add_user(txn, host.id, game.id, guest.id)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::AlreadyInvited);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn only_the_invitee_may_answer() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let guest = seed_user(txn, "guest").await?;
            let games = GameService::new();
            let invites = InviteService::new();
            games
                .create(txn, host.id, game_client("Mine", &[guest.id]))
                .await?;

            let invite_id = invites.list(txn, guest.id, None).await?[0].id;
            let err = invites.accept(txn, host.id, invite_id).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::Forbidden);

            let err = invites
                .decline(txn, guest.id, uuid::Uuid::new_v4())
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::InviteNotFound);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn removing_a_member_drops_membership_and_invite() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let host = seed_user(txn, "host").await?;
            let guest = seed_user(txn, "guest").await?;
            let games = GameService::new();
            let invites = InviteService::new();
            let game = games
                .create(txn, host.id, game_client("Kick", &[guest.id]))
                .await?;
            let invite_id = invites.list(txn, guest.id, None).await?[0].id;
            invites.accept(txn, guest.id, invite_id).await?;

            let after = games.remove_user(txn, host.id, game.id, guest.id).await?;
            assert!(after.users.iter().all(|u| u.id != guest.id));
            assert!(invites.list(txn, guest.id, None).await?.is_empty());

            let err = games
                .remove_user(txn, host.id, game.id, guest.id)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::MemberNotFound);

            let err = games
                .remove_user(txn, host.id, game.id, host.id)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);

            Ok::<_, AppError>(())
        })
    })
    .await
}
