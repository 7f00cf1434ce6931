//! Registration, login and user lookup.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password;
use crate::domain::client::UserClient;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User};

/// Emails are stored trimmed and lowercased so lookups are exact.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    /// Create an account. Name and email must both be unused.
    pub async fn register<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);
        let digest = password::hash(plain_password)?;
        let user = users::create_user(conn, name.trim(), &email, digest).await?;
        info!(user_id = %user.id, email = %Redacted(&email), "user registered");
        Ok(user)
    }

    /// Check an email/password pair. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
        plain_password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);
        let invalid =
            || AppError::unauthorized(ErrorCode::InvalidCredentials, "Invalid email or password");

        let Some((user, digest)) = users::find_with_hash_by_email(conn, &email).await? else {
            warn!(email = %Redacted(&email), "login for unknown email");
            return Err(invalid());
        };
        if !password::verify(plain_password, &digest)? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(invalid());
        }
        Ok(user)
    }

    pub async fn me<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<User, AppError> {
        users::find_user_by_id(conn, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))
    }

    pub async fn search<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: &str,
        limit: u64,
    ) -> Result<Vec<UserClient>, AppError> {
        let found = users::search_users(conn, query, limit).await?;
        Ok(found
            .into_iter()
            .map(|u| UserClient {
                id: u.id,
                name: u.name,
            })
            .collect())
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}
