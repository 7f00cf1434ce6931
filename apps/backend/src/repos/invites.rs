//! Invite repository functions: creation, status transitions and listing.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::adapters::{exec_insert, invites_sea as invites_adapter};
use crate::domain::client::GameInviteClient;
use crate::entities::{game_invites, InviteStatus};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::reader::to_millis;

/// Game invite domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Invite {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub status: InviteStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<game_invites::Model> for Invite {
    fn from(m: game_invites::Model) -> Self {
        Self {
            id: m.id,
            game_id: m.game_id,
            user_id: m.user_id,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub async fn find_invite<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invite_id: Uuid,
) -> Result<Option<Invite>, DomainError> {
    let invite = invites_adapter::find_by_id(conn, invite_id).await?;
    Ok(invite.map(Invite::from))
}

pub async fn require_invite<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invite_id: Uuid,
) -> Result<Invite, DomainError> {
    find_invite(conn, invite_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Invite, format!("Invite {invite_id} not found"))
    })
}

/// Invite `user_id` to `game_id` as pending.
///
/// A second invite for the same pair is an `AlreadyInvited` conflict.
pub async fn create_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<Invite, DomainError> {
    let model = game_invites::Model {
        id: Uuid::new_v4(),
        game_id,
        user_id,
        status: InviteStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    exec_insert(conn, &invites_adapter::insert_stmt(model.clone())).await?;
    Ok(Invite::from(model))
}

/// Invite `user_id`, or reopen their declined invite as pending.
///
/// A pending or accepted invite already in place is an `AlreadyInvited`
/// conflict.
pub async fn invite_or_reopen<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<Invite, DomainError> {
    let Some(existing) = invites_adapter::find_by_game_user(conn, game_id, user_id).await? else {
        return create_pending(conn, game_id, user_id, now).await;
    };

    if existing.status != InviteStatus::Declined {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyInvited,
            "User already invited to this game",
        ));
    }
    let affected = invites_adapter::transition(
        conn,
        existing.id,
        InviteStatus::Declined,
        InviteStatus::Pending,
        now,
    )
    .await?;
    if affected != 1 {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyInvited,
            "User already invited to this game",
        ));
    }
    Ok(Invite {
        status: InviteStatus::Pending,
        updated_at: now,
        ..Invite::from(existing)
    })
}

/// Move a pending invite to `to`. Anything but pending is an
/// `InviteNotPending` conflict, including a concurrent transition.
pub async fn resolve_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invite_id: Uuid,
    to: InviteStatus,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    let affected =
        invites_adapter::transition(conn, invite_id, InviteStatus::Pending, to, now).await?;
    if affected == 1 {
        return Ok(());
    }
    match find_invite(conn, invite_id).await? {
        None => Err(DomainError::not_found(
            NotFoundKind::Invite,
            format!("Invite {invite_id} not found"),
        )),
        Some(current) => Err(DomainError::conflict(
            ConflictKind::InviteNotPending,
            format!("Invite is already {}", current.status.as_str()),
        )),
    }
}

/// Invites addressed to `user_id`, newest first.
pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    status: Option<InviteStatus>,
) -> Result<Vec<GameInviteClient>, DomainError> {
    let rows = invites_adapter::list_for_user(conn, user_id, status).await?;
    Ok(rows
        .into_iter()
        .map(|r| GameInviteClient {
            id: r.id,
            game_id: r.game_id,
            user_id: r.user_id,
            status: r.status,
            created_at: to_millis(r.created_at),
            updated_at: to_millis(r.updated_at),
            game_name: r.game_name,
            game_creator_name: r.game_creator_name,
        })
        .collect())
}

/// Drop any invite `user_id` holds for `game_id`.
pub async fn delete_for_game_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<u64, DomainError> {
    Ok(invites_adapter::delete_for_game_user(conn, game_id, user_id).await?)
}
