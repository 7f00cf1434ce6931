//! Invite domain service.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::domain::client::GameInviteClient;
use crate::entities::InviteStatus;
use crate::error::AppError;
use crate::repos::invites::{self, Invite};
use crate::repos::memberships;

/// Invite domain service.
pub struct InviteService;

impl InviteService {
    pub fn new() -> Self {
        Self
    }

    async fn own_invite<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        invite_id: Uuid,
    ) -> Result<Invite, AppError> {
        let invite = invites::require_invite(conn, invite_id).await?;
        if invite.user_id != caller {
            return Err(AppError::forbidden("Only the invitee may answer an invite"));
        }
        Ok(invite)
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        status: Option<InviteStatus>,
    ) -> Result<Vec<GameInviteClient>, AppError> {
        Ok(invites::list_for_user(conn, caller, status).await?)
    }

    /// pending -> accepted, then join the game. Joining twice is a no-op.
    pub async fn accept<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        invite_id: Uuid,
    ) -> Result<(), AppError> {
        let invite = self.own_invite(conn, caller, invite_id).await?;
        let now = OffsetDateTime::now_utc();
        invites::resolve_pending(conn, invite_id, InviteStatus::Accepted, now).await?;
        let joined = memberships::join_game(conn, invite.game_id, caller).await?;
        info!(invite_id = %invite_id, game_id = %invite.game_id, joined, "invite accepted");
        Ok(())
    }

    /// pending -> declined. No membership is created.
    pub async fn decline<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        invite_id: Uuid,
    ) -> Result<(), AppError> {
        self.own_invite(conn, caller, invite_id).await?;
        invites::resolve_pending(
            conn,
            invite_id,
            InviteStatus::Declined,
            OffsetDateTime::now_utc(),
        )
        .await?;
        info!(invite_id = %invite_id, "invite declined");
        Ok(())
    }
}

impl Default for InviteService {
    fn default() -> Self {
        Self::new()
    }
}
