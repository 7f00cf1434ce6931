//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::adapters::users_sea as users_adapter;
use crate::entities::users;
use crate::errors::domain::DomainError;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: time::OffsetDateTime,
}

impl From<users::Model> for User {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            is_admin: m.is_admin,
            created_at: m.created_at,
        }
    }
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

/// The user plus their stored argon2 digest, for login.
pub async fn find_with_hash_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<(User, String)>, DomainError> {
    let user = users_adapter::find_by_email(conn, email).await?;
    Ok(user.map(|m| {
        let hash = m.password_hash.clone();
        (User::from(m), hash)
    }))
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    email: &str,
    password_hash: String,
) -> Result<User, DomainError> {
    let dto = users_adapter::UserCreate {
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
    };
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

/// Users whose name contains `query`, case-insensitively.
pub async fn search_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    query: &str,
    limit: u64,
) -> Result<Vec<User>, DomainError> {
    let users = users_adapter::search_by_name(conn, query, limit).await?;
    Ok(users.into_iter().map(User::from).collect())
}

/// Which of `user_ids` exist.
pub async fn existing_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: Vec<Uuid>,
) -> Result<Vec<Uuid>, DomainError> {
    let users = users_adapter::find_by_ids(conn, user_ids).await?;
    Ok(users.into_iter().map(|u| u.id).collect())
}
