//! SeaORM adapter for game invites.

use sea_orm::sea_query::{Expr, InsertStatement};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, IntoActiveModel, JoinType,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::{game_invites, games, users, InviteStatus};

/// An invite joined with its game name and the game creator's name.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct InviteWithGame {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub status: InviteStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub game_name: String,
    pub game_creator_name: String,
}

pub fn insert_stmt(invite: game_invites::Model) -> InsertStatement {
    game_invites::Entity::insert(invite.into_active_model()).into_query()
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invite_id: Uuid,
) -> Result<Option<game_invites::Model>, sea_orm::DbErr> {
    game_invites::Entity::find_by_id(invite_id).one(conn).await
}

pub async fn find_by_game_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<Option<game_invites::Model>, sea_orm::DbErr> {
    game_invites::Entity::find()
        .filter(game_invites::Column::GameId.eq(game_id))
        .filter(game_invites::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Compare-and-swap `status` from `from` to `to`. Returns rows affected.
pub async fn transition<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invite_id: Uuid,
    from: InviteStatus,
    to: InviteStatus,
    now: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_invites::Entity::update_many()
        .col_expr(game_invites::Column::Status, Expr::value(to.as_str()))
        .col_expr(game_invites::Column::UpdatedAt, Expr::value(now))
        .filter(game_invites::Column::Id.eq(invite_id))
        .filter(game_invites::Column::Status.eq(from))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Pending and declined invites for every game in `game_ids`, with invitee rows.
pub async fn unconfirmed_for_games<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_ids: Vec<Uuid>,
) -> Result<Vec<(game_invites::Model, Option<users::Model>)>, sea_orm::DbErr> {
    if game_ids.is_empty() {
        return Ok(Vec::new());
    }
    game_invites::Entity::find()
        .find_also_related(users::Entity)
        .filter(game_invites::Column::GameId.is_in(game_ids))
        .filter(
            game_invites::Column::Status.is_in([InviteStatus::Pending, InviteStatus::Declined]),
        )
        .order_by_asc(game_invites::Column::CreatedAt)
        .order_by_asc(game_invites::Column::Id)
        .all(conn)
        .await
}

/// Invites addressed to `user_id`, newest first, optionally by status.
pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    status: Option<InviteStatus>,
) -> Result<Vec<InviteWithGame>, sea_orm::DbErr> {
    let mut query = game_invites::Entity::find()
        .select_only()
        .column(game_invites::Column::Id)
        .column(game_invites::Column::GameId)
        .column(game_invites::Column::UserId)
        .column(game_invites::Column::Status)
        .column(game_invites::Column::CreatedAt)
        .column(game_invites::Column::UpdatedAt)
        .column_as(games::Column::Name, "game_name")
        .column_as(users::Column::Name, "game_creator_name")
        .join(JoinType::InnerJoin, game_invites::Relation::Game.def())
        .join(JoinType::InnerJoin, games::Relation::Creator.def())
        .filter(game_invites::Column::UserId.eq(user_id));

    if let Some(status) = status {
        query = query.filter(game_invites::Column::Status.eq(status));
    }

    query
        .order_by_desc(game_invites::Column::CreatedAt)
        .order_by_asc(game_invites::Column::Id)
        .into_model::<InviteWithGame>()
        .all(conn)
        .await
}

pub async fn delete_for_game_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_invites::Entity::delete_many()
        .filter(game_invites::Column::GameId.eq(game_id))
        .filter(game_invites::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
