//! SeaORM adapter for answers keyed by (question, user).

use sea_orm::sea_query::{InsertStatement, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryTrait};
use uuid::Uuid;

use crate::entities::answers;

/// Insert or overwrite the answer for its (question, user) pair.
pub fn upsert_stmt(answer: answers::Model) -> InsertStatement {
    answers::Entity::insert(answer.into_active_model())
        .on_conflict(
            OnConflict::columns([answers::Column::QuestionId, answers::Column::UserId])
                .update_columns([answers::Column::IsCorrect, answers::Column::TimeAnswered])
                .to_owned(),
        )
        .into_query()
}

pub async fn find_by_question_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_ids: Vec<Uuid>,
) -> Result<Vec<answers::Model>, sea_orm::DbErr> {
    if question_ids.is_empty() {
        return Ok(Vec::new());
    }
    answers::Entity::find()
        .filter(answers::Column::QuestionId.is_in(question_ids))
        .all(conn)
        .await
}
