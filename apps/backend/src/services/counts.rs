//! Dashboard counters.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::filter::GameFilter;
use crate::error::AppError;
use crate::repos::{games, templates};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyCounts {
    /// Unfinished games the user is a member of
    pub games_count: u64,
    pub templates_count: u64,
    /// Finished games the user is a member of
    pub history_games_count: u64,
}

pub struct CountService;

impl CountService {
    pub fn new() -> Self {
        Self
    }

    pub async fn mine<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> Result<MyCounts, AppError> {
        Ok(MyCounts {
            games_count: games::count_games(conn, GameFilter::User(user_id)).await?,
            templates_count: templates::count_by_creator(conn, user_id).await?,
            history_games_count: games::count_games(conn, GameFilter::UserFinished(user_id))
                .await?,
        })
    }

    pub async fn public_templates<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, AppError> {
        Ok(templates::count_public(conn).await?)
    }
}

impl Default for CountService {
    fn default() -> Self {
        Self::new()
    }
}
