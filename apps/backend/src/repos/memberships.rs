//! Membership repository functions for domain layer.

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::adapters::{exec_insert, game_users_sea as memberships_adapter};
use crate::errors::domain::{DomainError, NotFoundKind};

pub async fn is_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<bool, DomainError> {
    Ok(memberships_adapter::is_member(conn, game_id, user_id).await?)
}

/// Add the membership if missing. Returns whether a row was inserted.
pub async fn join_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<bool, DomainError> {
    let stmt = memberships_adapter::upsert_do_nothing_stmt(game_id, user_id);
    Ok(exec_insert(conn, &stmt).await? > 0)
}

pub async fn leave_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<(), DomainError> {
    if memberships_adapter::delete(conn, game_id, user_id).await? == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Membership,
            format!("user {user_id} is not a member of game {game_id}"),
        ));
    }
    Ok(())
}
