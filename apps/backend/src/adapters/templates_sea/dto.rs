//! Row shapes for templates_sea queries.

use sea_orm::prelude::Json;
use sea_orm::FromQueryResult;
use time::OffsetDateTime;
use uuid::Uuid;

/// One row of the template LEFT JOIN tree query.
///
/// Round, theme and question columns are NULL when the parent has no
/// children yet.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct TemplateTreeRow {
    pub template_id: Uuid,
    pub template_name: String,
    pub template_description: String,
    pub template_is_public: bool,
    pub template_creator_id: Uuid,
    pub template_created_at: OffsetDateTime,
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
