//! Session cookies carrying the token pair.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};

use super::jwt::TokenPair;
use crate::state::security_config::SecurityConfig;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
/// The refresh token is only ever sent to the refresh endpoint.
pub const REFRESH_PATH: &str = "/api/auth/refresh";

fn session_cookie(
    name: &'static str,
    value: String,
    path: &'static str,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build(name, value)
        .path(path)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

/// Access and refresh cookies for a freshly issued pair.
pub fn session_cookies(pair: TokenPair, security: &SecurityConfig) -> [Cookie<'static>; 2] {
    [
        session_cookie(
            ACCESS_COOKIE,
            pair.access,
            "/",
            security.access_ttl.as_secs() as i64,
            security.cookie_secure,
        ),
        session_cookie(
            REFRESH_COOKIE,
            pair.refresh,
            REFRESH_PATH,
            security.refresh_ttl.as_secs() as i64,
            security.cookie_secure,
        ),
    ]
}

/// Expired blanks that overwrite both session cookies.
pub fn cleared_cookies(security: &SecurityConfig) -> [Cookie<'static>; 2] {
    [
        session_cookie(ACCESS_COOKIE, String::new(), "/", 0, security.cookie_secure),
        session_cookie(REFRESH_COOKIE, String::new(), REFRESH_PATH, 0, security.cookie_secure),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_cookie_is_scoped_to_refresh_path() {
        let security = SecurityConfig::default().with_cookie_secure(false);
        let [access, refresh] = session_cookies(
            TokenPair {
                access: "a".into(),
                refresh: "r".into(),
            },
            &security,
        );

        assert_eq!(access.path(), Some("/"));
        assert_eq!(refresh.path(), Some(REFRESH_PATH));
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.secure(), Some(false));
    }

    #[test]
    fn cleared_cookies_expire_immediately() {
        let [access, refresh] = cleared_cookies(&SecurityConfig::default());
        assert_eq!(access.value(), "");
        assert_eq!(access.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(refresh.max_age(), Some(CookieDuration::ZERO));
    }
}
