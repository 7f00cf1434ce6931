//! SeaORM adapter for game memberships and their score maps.

use sea_orm::sea_query::{Expr, InsertStatement, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QueryTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{game_users, users};

fn empty_member(game_id: Uuid, user_id: Uuid) -> game_users::ActiveModel {
    game_users::Model {
        game_id,
        user_id,
        round_score: json!({}),
    }
    .into_active_model()
}

pub fn insert_stmt(game_id: Uuid, user_id: Uuid) -> InsertStatement {
    game_users::Entity::insert(empty_member(game_id, user_id)).into_query()
}

/// Insert the membership unless it already exists.
pub fn upsert_do_nothing_stmt(game_id: Uuid, user_id: Uuid) -> InsertStatement {
    game_users::Entity::insert(empty_member(game_id, user_id))
        .on_conflict(
            OnConflict::columns([game_users::Column::GameId, game_users::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .into_query()
}

/// Memberships of `game_ids` with their users, ordered by user name.
pub async fn find_with_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_ids: Vec<Uuid>,
) -> Result<Vec<(game_users::Model, Option<users::Model>)>, sea_orm::DbErr> {
    if game_ids.is_empty() {
        return Ok(Vec::new());
    }
    game_users::Entity::find()
        .find_also_related(users::Entity)
        .filter(game_users::Column::GameId.is_in(game_ids))
        .order_by_asc(users::Column::Name)
        .all(conn)
        .await
}

pub async fn member_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
) -> Result<Vec<Uuid>, sea_orm::DbErr> {
    Ok(game_users::Entity::find()
        .filter(game_users::Column::GameId.eq(game_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect())
}

pub async fn is_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sea_orm::DbErr> {
    let n = game_users::Entity::find()
        .filter(game_users::Column::GameId.eq(game_id))
        .filter(game_users::Column::UserId.eq(user_id))
        .count(conn)
        .await?;
    Ok(n > 0)
}

/// Overwrite one member's score map. Returns rows affected.
pub async fn update_round_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member: game_users::Model,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_users::Entity::update_many()
        .col_expr(game_users::Column::RoundScore, Expr::value(member.round_score))
        .filter(game_users::Column::GameId.eq(member.game_id))
        .filter(game_users::Column::UserId.eq(member.user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_users::Entity::delete_many()
        .filter(game_users::Column::GameId.eq(game_id))
        .filter(game_users::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
