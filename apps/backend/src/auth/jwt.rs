use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ErrorCode;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Clock skew tolerated when checking `exp`.
const LEEWAY_SECS: u64 = 5;

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims included in backend-issued tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub kind: TokenKind,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

fn mint(
    user_id: Uuid,
    kind: TokenKind,
    now: SystemTime,
    ttl_secs: u64,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id,
        kind,
        iat,
        exp: iat + ttl_secs as i64,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Mint an access/refresh pair for `user_id` using the configured TTLs.
pub fn issue_pair(
    user_id: Uuid,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access: mint(
            user_id,
            TokenKind::Access,
            now,
            security.access_ttl.as_secs(),
            security,
        )?,
        refresh: mint(
            user_id,
            TokenKind::Refresh,
            now,
            security.refresh_ttl.as_secs(),
            security,
        )?,
    })
}

/// Verify a token of the expected `kind` and return its claims.
///
/// Only the configured algorithm is accepted. Expired tokens report
/// `UNAUTHORIZED_EXPIRED_TOKEN`; everything else `UNAUTHORIZED_INVALID_TOKEN`.
pub fn verify(token: &str, kind: TokenKind, security: &SecurityConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = LEEWAY_SECS;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            AppError::unauthorized(ErrorCode::UnauthorizedExpiredToken, "Token expired")
        }
        ErrorKind::InvalidSignature => {
            AppError::unauthorized(ErrorCode::UnauthorizedInvalidToken, "Invalid token signature")
        }
        _ => AppError::unauthorized(ErrorCode::UnauthorizedInvalidToken, "Invalid token"),
    })?;

    if claims.kind != kind {
        return Err(AppError::unauthorized(
            ErrorCode::UnauthorizedInvalidToken,
            "Wrong token kind",
        ));
    }
    Ok(claims)
}
