//! Error codes for the trivia backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// No session cookie or Bearer token
    UnauthorizedMissingToken,
    /// Token failed verification
    UnauthorizedInvalidToken,
    /// Token has expired
    UnauthorizedExpiredToken,
    /// Email/password pair did not match
    InvalidCredentials,
    /// Access denied
    Forbidden,

    // Request Validation
    /// Field-level or business-rule validation failure
    ValidationError,
    /// Malformed request
    BadRequest,
    /// Unknown game listing filter
    InvalidFilter,
    /// Offset/limit out of range
    InvalidPagination,
    /// Child row filed under the wrong parent
    IntegrityViolation,

    // Resource Not Found
    TemplateNotFound,
    GameNotFound,
    UserNotFound,
    InviteNotFound,
    MemberNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    EmailTaken,
    NameTaken,
    InviteNotPending,
    GameAlreadyFinished,
    AlreadyInvited,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingToken => "UNAUTHORIZED_MISSING_TOKEN",
            Self::UnauthorizedInvalidToken => "UNAUTHORIZED_INVALID_TOKEN",
            Self::UnauthorizedExpiredToken => "UNAUTHORIZED_EXPIRED_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidFilter => "INVALID_FILTER",
            Self::InvalidPagination => "INVALID_PAGINATION",
            Self::IntegrityViolation => "INTEGRITY_VIOLATION",

            Self::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InviteNotFound => "INVITE_NOT_FOUND",
            Self::MemberNotFound => "MEMBER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::EmailTaken => "EMAIL_TAKEN",
            Self::NameTaken => "NAME_TAKEN",
            Self::InviteNotPending => "INVITE_NOT_PENDING",
            Self::GameAlreadyFinished => "GAME_ALREADY_FINISHED",
            Self::AlreadyInvited => "ALREADY_INVITED",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Every code, for uniqueness checks.
    pub const ALL: &'static [ErrorCode] = &[
        Self::Unauthorized,
        Self::UnauthorizedMissingToken,
        Self::UnauthorizedInvalidToken,
        Self::UnauthorizedExpiredToken,
        Self::InvalidCredentials,
        Self::Forbidden,
        Self::ValidationError,
        Self::BadRequest,
        Self::InvalidFilter,
        Self::InvalidPagination,
        Self::IntegrityViolation,
        Self::TemplateNotFound,
        Self::GameNotFound,
        Self::UserNotFound,
        Self::InviteNotFound,
        Self::MemberNotFound,
        Self::NotFound,
        Self::EmailTaken,
        Self::NameTaken,
        Self::InviteNotPending,
        Self::GameAlreadyFinished,
        Self::AlreadyInvited,
        Self::Conflict,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::DataCorruption,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique_screaming_snake() {
        let mut seen = HashSet::new();
        for code in ErrorCode::ALL {
            let s = code.as_str();
            assert!(seen.insert(s), "duplicate code {s}");
            assert!(s
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit()));
        }
    }
}
