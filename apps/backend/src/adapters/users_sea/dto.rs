//! DTOs for users_sea adapter.

/// DTO for registering a user; `password_hash` is already an argon2 digest.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
