//! SeaORM adapter for user repository.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::like_pattern;
use crate::entities::users;

pub mod dto;

pub use dto::UserCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: Vec<Uuid>,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    users::Entity::find()
        .filter(users::Column::Id.is_in(user_ids))
        .all(conn)
        .await
}

/// `(id, name)` pairs for `user_ids`.
pub async fn names_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: Vec<Uuid>,
) -> Result<Vec<(Uuid, String)>, sea_orm::DbErr> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    users::Entity::find()
        .select_only()
        .column(users::Column::Id)
        .column(users::Column::Name)
        .filter(users::Column::Id.is_in(user_ids))
        .into_tuple::<(Uuid, String)>()
        .all(conn)
        .await
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

/// Case-insensitive substring search on name, ordered by name.
pub async fn search_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    query: &str,
    limit: u64,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col((users::Entity, users::Column::Name))))
                .like(LikeExpr::new(like_pattern(query)).escape('\\')),
        )
        .order_by_asc(users::Column::Name)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let user_active = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(dto.name),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        is_admin: Set(false),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    user_active.insert(conn).await
}
