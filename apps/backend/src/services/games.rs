//! Game domain service.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::domain::client::GameClient;
use crate::domain::filter::GameFilter;
use crate::domain::pagination::{Page, PageRequest};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::mappers::{to_create_game, to_update_game};
use crate::repos::games::{self, GameRoot};
use crate::repos::{invites, memberships, reader, writer};

/// Game domain service.
pub struct GameService;

impl GameService {
    pub fn new() -> Self {
        Self
    }

    async fn creator_root<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        game_id: Uuid,
    ) -> Result<GameRoot, AppError> {
        let game = games::require_game(conn, game_id).await?;
        if game.creator_id != caller {
            return Err(AppError::forbidden("Only the game creator may do this"));
        }
        Ok(game)
    }

    /// Persist a raw client game with `creator` as owner and first participant.
    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        creator: Uuid,
        client: GameClient,
    ) -> Result<GameClient, AppError> {
        let now = OffsetDateTime::now_utc();
        let rows = to_create_game(&client, creator, now);
        let invited = rows.participants.len() - 1;
        writer::create_game(conn, rows, now).await?;
        info!(game_id = %client.id, creator_id = %creator, invited, "game created");
        Ok(reader::fetch_game(conn, client.id).await?)
    }

    pub async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: Uuid,
    ) -> Result<GameClient, AppError> {
        Ok(reader::fetch_game(conn, game_id).await?)
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: GameFilter,
        page: &PageRequest,
    ) -> Result<Page<GameClient>, AppError> {
        Ok(reader::list_games(conn, filter, page).await?)
    }

    /// Apply a member's update: game fields, score maps and answers.
    pub async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        game_id: Uuid,
        mut client: GameClient,
    ) -> Result<GameClient, AppError> {
        games::require_game(conn, game_id).await?;
        if !memberships::is_member(conn, game_id, caller).await? {
            return Err(AppError::forbidden("Only game members may update the game"));
        }
        client.id = game_id;
        writer::update_game(conn, to_update_game(&client), OffsetDateTime::now_utc()).await?;
        Ok(reader::fetch_game(conn, game_id).await?)
    }

    /// Finish the game with `winner_id`, who must be a member.
    pub async fn finish<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        game_id: Uuid,
        winner_id: Uuid,
    ) -> Result<GameClient, AppError> {
        let game = self.creator_root(conn, caller, game_id).await?;
        if game.is_finished {
            return Err(DomainError::conflict(
                ConflictKind::GameAlreadyFinished,
                format!("Game {game_id} is already finished"),
            )
            .into());
        }
        if !memberships::is_member(conn, game_id, winner_id).await? {
            return Err(DomainError::validation(format!(
                "winner {winner_id} is not a member of game {game_id}"
            ))
            .into());
        }
        games::finish_game(conn, game_id, winner_id, OffsetDateTime::now_utc()).await?;
        info!(game_id = %game_id, winner_id = %winner_id, "game finished");
        Ok(reader::fetch_game(conn, game_id).await?)
    }

    /// Invite `user_id`; a declined invite is reopened as pending.
    pub async fn add_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        game_id: Uuid,
        user_id: Uuid,
    ) -> Result<GameClient, AppError> {
        let game = self.creator_root(conn, caller, game_id).await?;
        if game.is_finished {
            return Err(DomainError::conflict(
                ConflictKind::GameAlreadyFinished,
                format!("Game {game_id} is already finished"),
            )
            .into());
        }
        invites::invite_or_reopen(conn, game_id, user_id, OffsetDateTime::now_utc()).await?;
        Ok(reader::fetch_game(conn, game_id).await?)
    }

    /// Drop `user_id`'s membership and invite. The creator cannot be removed.
    pub async fn remove_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        game_id: Uuid,
        user_id: Uuid,
    ) -> Result<GameClient, AppError> {
        let game = self.creator_root(conn, caller, game_id).await?;
        if user_id == game.creator_id {
            return Err(DomainError::validation("The game creator cannot be removed").into());
        }

        let was_member = memberships::is_member(conn, game_id, user_id).await?;
        let invites_removed = invites::delete_for_game_user(conn, game_id, user_id).await?;
        if was_member {
            memberships::leave_game(conn, game_id, user_id).await?;
        } else if invites_removed == 0 {
            return Err(DomainError::not_found(
                NotFoundKind::Membership,
                format!("user {user_id} is not part of game {game_id}"),
            )
            .into());
        }
        Ok(reader::fetch_game(conn, game_id).await?)
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new()
    }
}
