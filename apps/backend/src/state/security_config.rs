use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::config::env::{must_var_from, parse_duration, var_from};
use crate::error::AppError;

const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Token signing and session cookie settings.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Always HS256; verification rejects any other algorithm
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// `Secure` attribute on session cookies (off only for plain-HTTP tests)
    pub cookie_secure: bool,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
            cookie_secure: true,
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Read `BACKEND_JWT_SECRET` (required), `ACCESS_TOKEN_TTL`,
    /// `REFRESH_TOKEN_TTL` and `COOKIE_SECURE`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = must_var_from(&lookup, "BACKEND_JWT_SECRET")?;
        let access_ttl = match var_from(&lookup, "ACCESS_TOKEN_TTL") {
            Some(raw) => parse_duration(&raw)?,
            None => DEFAULT_ACCESS_TTL,
        };
        let refresh_ttl = match var_from(&lookup, "REFRESH_TOKEN_TTL") {
            Some(raw) => parse_duration(&raw)?,
            None => DEFAULT_REFRESH_TTL,
        };
        let cookie_secure = var_from(&lookup, "COOKIE_SECURE")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self::new(secret.into_bytes())
            .with_ttls(access_ttl, refresh_ttl)
            .with_cookie_secure(cookie_secure))
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
