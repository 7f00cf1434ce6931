//! Row shapes for games_sea queries.

use sea_orm::prelude::Json;
use sea_orm::FromQueryResult;
use time::OffsetDateTime;
use uuid::Uuid;

/// One row of the game LEFT JOIN tree query.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct GameTreeRow {
    pub game_id: Uuid,
    pub game_name: String,
    pub game_creator_id: Uuid,
    pub game_template_id: Option<Uuid>,
    pub game_is_finished: bool,
    pub game_winner_id: Option<Uuid>,
    pub game_finish_date: Option<OffsetDateTime>,
    pub game_current_round_id: Option<Uuid>,
    pub game_current_question_id: Option<Uuid>,
    pub game_current_user_id: Option<Uuid>,
    pub game_created_at: OffsetDateTime,
    pub round_id: Option<Uuid>,
    pub round_name: Option<String>,
    pub round_time_settings: Option<Json>,
    pub round_rank_settings: Option<Json>,
    pub round_position: Option<i32>,
    pub theme_id: Option<Uuid>,
    pub theme_name: Option<String>,
    pub theme_position: Option<i32>,
    pub question_id: Option<Uuid>,
    pub question_text: Option<String>,
    pub question_answer: Option<String>,
    pub question_points: Option<i32>,
    pub question_position: Option<i32>,
}

/// Mutable game fields applied by one conditional update.
#[derive(Debug, Clone)]
pub struct GameFieldsUpdate {
    pub id: Uuid,
    pub name: String,
    pub current_round_id: Option<Uuid>,
    pub current_question_id: Option<Uuid>,
    pub current_user_id: Option<Uuid>,
    /// `Some` applies the finish transition in the same statement.
    pub finish: Option<(Uuid, OffsetDateTime)>,
}
