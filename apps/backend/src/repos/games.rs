//! Game repository functions: root lookups, finish and counts.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::adapters::games_sea as games_adapter;
use crate::domain::filter::GameFilter;
use crate::entities::games;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// Game root without its tree.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRoot {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub template_id: Option<Uuid>,
    pub name: String,
    pub is_finished: bool,
    pub winner_id: Option<Uuid>,
}

impl From<games::Model> for GameRoot {
    fn from(m: games::Model) -> Self {
        Self {
            id: m.id,
            creator_id: m.creator_id,
            template_id: m.template_id,
            name: m.name,
            is_finished: m.is_finished,
            winner_id: m.winner_id,
        }
    }
}

fn game_not_found(game_id: Uuid) -> DomainError {
    DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
}

pub async fn find_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
) -> Result<Option<GameRoot>, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    Ok(game.map(GameRoot::from))
}

pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
) -> Result<GameRoot, DomainError> {
    find_game(conn, game_id)
        .await?
        .ok_or_else(|| game_not_found(game_id))
}

/// Mark the game finished with `winner_id`.
///
/// Only the first finish wins; a second one is a `GameAlreadyFinished`
/// conflict and leaves the stored winner untouched.
pub async fn finish_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    winner_id: Uuid,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if games_adapter::finish(conn, game_id, winner_id, now).await? == 1 {
        return Ok(());
    }
    match find_game(conn, game_id).await? {
        None => Err(game_not_found(game_id)),
        Some(_) => Err(DomainError::conflict(
            ConflictKind::GameAlreadyFinished,
            format!("Game {game_id} is already finished"),
        )),
    }
}

pub async fn count_games<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: GameFilter,
) -> Result<u64, DomainError> {
    Ok(games_adapter::count(conn, filter).await?)
}
