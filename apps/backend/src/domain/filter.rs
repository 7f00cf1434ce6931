//! Closed filter vocabularies for game and template listings.

use std::fmt;

use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFilter {
    /// Exactly one game.
    Id(Uuid),
    CreatorId(Uuid),
    /// Unfinished games the user is a member of.
    User(Uuid),
    /// Finished games the user is a member of.
    UserFinished(Uuid),
    /// Unfinished games created from a public template.
    PublicUnfinished,
    PublicFinished,
    All,
}

impl GameFilter {
    /// Parse the `filter` discriminator and its `value`.
    ///
    /// `id`, `creator_id`, `user` and `user_finished` require a UUID value.
    pub fn parse(kind: &str, value: Option<&str>) -> Result<Self, AppError> {
        let uuid_value = || -> Result<Uuid, AppError> {
            let raw = value.ok_or_else(|| {
                AppError::invalid(
                    ErrorCode::InvalidFilter,
                    format!("filter '{kind}' requires a value"),
                )
            })?;
            Uuid::parse_str(raw.trim()).map_err(|_| {
                AppError::invalid(
                    ErrorCode::InvalidFilter,
                    format!("filter '{kind}' value is not a valid id"),
                )
            })
        };

        match kind {
            "id" => Ok(GameFilter::Id(uuid_value()?)),
            "creator_id" => Ok(GameFilter::CreatorId(uuid_value()?)),
            "user" => Ok(GameFilter::User(uuid_value()?)),
            "user_finished" => Ok(GameFilter::UserFinished(uuid_value()?)),
            "public_unfinished" => Ok(GameFilter::PublicUnfinished),
            "public_finished" => Ok(GameFilter::PublicFinished),
            "all" => Ok(GameFilter::All),
            other => Err(AppError::invalid(
                ErrorCode::InvalidFilter,
                format!("unknown filter '{other}'"),
            )),
        }
    }

    /// Listings under this filter also report pending/declined invitees.
    pub fn includes_unconfirmed(&self) -> bool {
        matches!(self, GameFilter::User(_))
    }
}

impl fmt::Display for GameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameFilter::Id(id) => write!(f, "id={id}"),
            GameFilter::CreatorId(id) => write!(f, "creator_id={id}"),
            GameFilter::User(id) => write!(f, "user={id}"),
            GameFilter::UserFinished(id) => write!(f, "user_finished={id}"),
            GameFilter::PublicUnfinished => f.write_str("public_unfinished"),
            GameFilter::PublicFinished => f.write_str("public_finished"),
            GameFilter::All => f.write_str("all"),
        }
    }
}

/// Template listings are always scoped to what the caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFilter {
    /// Public templates plus the caller's own.
    All(Uuid),
    Public,
    Mine(Uuid),
}

impl TemplateFilter {
    pub fn parse(kind: Option<&str>, caller: Uuid) -> Result<Self, AppError> {
        match kind.unwrap_or("all") {
            "all" => Ok(TemplateFilter::All(caller)),
            "public" => Ok(TemplateFilter::Public),
            "mine" => Ok(TemplateFilter::Mine(caller)),
            other => Err(AppError::invalid(
                ErrorCode::InvalidFilter,
                format!("unknown filter '{other}'"),
            )),
        }
    }
}
