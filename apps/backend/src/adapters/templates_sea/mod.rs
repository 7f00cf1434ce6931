//! SeaORM adapter for templates and their round/theme/question trees.

use sea_orm::sea_query::{Expr, Func, InsertStatement, LikeExpr, OnConflict, Query};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
};
use uuid::Uuid;

use super::like_pattern;
use crate::domain::filter::TemplateFilter;
use crate::domain::pagination::PageRequest;
use crate::entities::{game_templates, games, template_questions, template_rounds, template_themes};

pub mod dto;

pub use dto::TemplateTreeRow;

fn filter_condition(filter: TemplateFilter, query: Option<&str>) -> Condition {
    let visibility = match filter {
        TemplateFilter::All(caller) => Condition::any()
            .add(game_templates::Column::IsPublic.eq(true))
            .add(game_templates::Column::CreatorId.eq(caller)),
        TemplateFilter::Public => Condition::all().add(game_templates::Column::IsPublic.eq(true)),
        TemplateFilter::Mine(caller) => {
            Condition::all().add(game_templates::Column::CreatorId.eq(caller))
        }
    };

    let mut cond = Condition::all().add(visibility);
    if let Some(q) = query {
        cond = cond.add(
            Expr::expr(Func::lower(Expr::col((
                game_templates::Entity,
                game_templates::Column::Name,
            ))))
            .like(LikeExpr::new(like_pattern(q)).escape('\\')),
        );
    }
    cond
}

/// Ids of one page of templates (newest first) plus the total match count.
pub async fn page_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: TemplateFilter,
    page: &PageRequest,
) -> Result<(Vec<Uuid>, u64), sea_orm::DbErr> {
    let base = game_templates::Entity::find()
        .select_only()
        .column(game_templates::Column::Id)
        .filter(filter_condition(filter, page.query.as_deref()));

    let total = base.clone().count(conn).await?;
    let ids = base
        .order_by_desc(game_templates::Column::CreatedAt)
        .order_by_asc(game_templates::Column::Id)
        .offset(page.offset)
        .limit(page.limit)
        .into_tuple::<Uuid>()
        .all(conn)
        .await?;

    Ok((ids, total))
}

/// The LEFT JOIN tree for `template_ids`, one row per deepest node.
pub async fn tree_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_ids: Vec<Uuid>,
) -> Result<Vec<TemplateTreeRow>, sea_orm::DbErr> {
    if template_ids.is_empty() {
        return Ok(Vec::new());
    }

    game_templates::Entity::find()
        .select_only()
        .column_as(game_templates::Column::Id, "template_id")
        .column_as(game_templates::Column::Name, "template_name")
        .column_as(game_templates::Column::Description, "template_description")
        .column_as(game_templates::Column::IsPublic, "template_is_public")
        .column_as(game_templates::Column::CreatorId, "template_creator_id")
        .column_as(game_templates::Column::CreatedAt, "template_created_at")
        .column_as(template_rounds::Column::Id, "round_id")
        .column_as(template_rounds::Column::Name, "round_name")
        .column_as(template_rounds::Column::TimeSettings, "round_time_settings")
        .column_as(template_rounds::Column::RankSettings, "round_rank_settings")
        .column_as(template_rounds::Column::Position, "round_position")
        .column_as(template_themes::Column::Id, "theme_id")
        .column_as(template_themes::Column::Name, "theme_name")
        .column_as(template_themes::Column::Position, "theme_position")
        .column_as(template_questions::Column::Id, "question_id")
        .column_as(template_questions::Column::Text, "question_text")
        .column_as(template_questions::Column::Answer, "question_answer")
        .column_as(template_questions::Column::Points, "question_points")
        .column_as(template_questions::Column::Position, "question_position")
        .join(
            JoinType::LeftJoin,
            game_templates::Relation::TemplateRounds.def(),
        )
        .join(
            JoinType::LeftJoin,
            template_rounds::Relation::TemplateThemes.def(),
        )
        .join(
            JoinType::LeftJoin,
            template_themes::Relation::TemplateQuestions.def(),
        )
        .filter(game_templates::Column::Id.is_in(template_ids))
        .order_by_desc(game_templates::Column::CreatedAt)
        .order_by_asc(game_templates::Column::Id)
        .order_by_asc(template_rounds::Column::Position)
        .order_by_asc(template_themes::Column::Position)
        .order_by_asc(template_questions::Column::Points)
        .into_model::<TemplateTreeRow>()
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
) -> Result<Option<game_templates::Model>, sea_orm::DbErr> {
    game_templates::Entity::find_by_id(template_id).one(conn).await
}

pub async fn insert_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template: game_templates::Model,
) -> Result<u64, sea_orm::DbErr> {
    game_templates::Entity::insert(template.into_active_model())
        .exec_without_returning(conn)
        .await
}

/// Update name/description/visibility in place; creator and created_at never change.
pub async fn update_template_root<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template: &game_templates::Model,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_templates::Entity::update_many()
        .col_expr(game_templates::Column::Name, Expr::value(template.name.clone()))
        .col_expr(
            game_templates::Column::Description,
            Expr::value(template.description.clone()),
        )
        .col_expr(game_templates::Column::IsPublic, Expr::value(template.is_public))
        .filter(game_templates::Column::Id.eq(template.id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub fn insert_round_stmt(round: template_rounds::Model) -> InsertStatement {
    template_rounds::Entity::insert(round.into_active_model()).into_query()
}

pub fn upsert_round_stmt(round: template_rounds::Model) -> InsertStatement {
    template_rounds::Entity::insert(round.into_active_model())
        .on_conflict(
            OnConflict::column(template_rounds::Column::Id)
                .update_columns([
                    template_rounds::Column::Name,
                    template_rounds::Column::TimeSettings,
                    template_rounds::Column::RankSettings,
                    template_rounds::Column::Position,
                ])
                .to_owned(),
        )
        .into_query()
}

pub fn insert_theme_stmt(theme: template_themes::Model) -> InsertStatement {
    template_themes::Entity::insert(theme.into_active_model()).into_query()
}

pub fn upsert_theme_stmt(theme: template_themes::Model) -> InsertStatement {
    template_themes::Entity::insert(theme.into_active_model())
        .on_conflict(
            OnConflict::column(template_themes::Column::Id)
                .update_columns([
                    template_themes::Column::RoundId,
                    template_themes::Column::Name,
                    template_themes::Column::Position,
                ])
                .to_owned(),
        )
        .into_query()
}

pub fn insert_question_stmt(question: template_questions::Model) -> InsertStatement {
    template_questions::Entity::insert(question.into_active_model()).into_query()
}

pub fn upsert_question_stmt(question: template_questions::Model) -> InsertStatement {
    template_questions::Entity::insert(question.into_active_model())
        .on_conflict(
            OnConflict::column(template_questions::Column::Id)
                .update_columns([
                    template_questions::Column::ThemeId,
                    template_questions::Column::Text,
                    template_questions::Column::Answer,
                    template_questions::Column::Points,
                    template_questions::Column::Position,
                ])
                .to_owned(),
        )
        .into_query()
}

fn round_ids_of(template_id: Uuid) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(template_rounds::Column::Id)
        .from(template_rounds::Entity)
        .and_where(template_rounds::Column::TemplateId.eq(template_id))
        .to_owned()
}

fn theme_ids_of(template_id: Uuid) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(template_themes::Column::Id)
        .from(template_themes::Entity)
        .and_where(template_themes::Column::RoundId.in_subquery(round_ids_of(template_id)))
        .to_owned()
}

/// Number of payload ids that already exist under a different template.
///
/// Upserting those would move another template's rows.
pub async fn count_foreign_children<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
    round_ids: Vec<Uuid>,
    theme_ids: Vec<Uuid>,
    question_ids: Vec<Uuid>,
) -> Result<u64, sea_orm::DbErr> {
    let rounds = template_rounds::Entity::find()
        .filter(template_rounds::Column::Id.is_in(round_ids))
        .filter(template_rounds::Column::TemplateId.ne(template_id))
        .count(conn)
        .await?;
    let themes = template_themes::Entity::find()
        .filter(template_themes::Column::Id.is_in(theme_ids))
        .filter(template_themes::Column::RoundId.not_in_subquery(round_ids_of(template_id)))
        .count(conn)
        .await?;
    let questions = template_questions::Entity::find()
        .filter(template_questions::Column::Id.is_in(question_ids))
        .filter(template_questions::Column::ThemeId.not_in_subquery(theme_ids_of(template_id)))
        .count(conn)
        .await?;
    Ok(rounds + themes + questions)
}

/// Delete children of `template_id` whose ids are not in the kept sets.
///
/// Questions go first, then themes, then rounds; deleting a round also
/// cascades to anything still under it.
pub async fn delete_absent_children<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
    keep_rounds: Vec<Uuid>,
    keep_themes: Vec<Uuid>,
    keep_questions: Vec<Uuid>,
) -> Result<u64, sea_orm::DbErr> {
    let questions = template_questions::Entity::delete_many()
        .filter(template_questions::Column::ThemeId.in_subquery(theme_ids_of(template_id)))
        .filter(template_questions::Column::Id.is_not_in(keep_questions))
        .exec(conn)
        .await?;
    let themes = template_themes::Entity::delete_many()
        .filter(template_themes::Column::RoundId.in_subquery(round_ids_of(template_id)))
        .filter(template_themes::Column::Id.is_not_in(keep_themes))
        .exec(conn)
        .await?;
    let rounds = template_rounds::Entity::delete_many()
        .filter(template_rounds::Column::TemplateId.eq(template_id))
        .filter(template_rounds::Column::Id.is_not_in(keep_rounds))
        .exec(conn)
        .await?;
    Ok(questions.rows_affected + themes.rows_affected + rounds.rows_affected)
}

/// Null every game's reference to the template, then delete the template.
///
/// Returns the number of template rows deleted (0 or 1).
pub async fn delete_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
) -> Result<u64, sea_orm::DbErr> {
    games::Entity::update_many()
        .col_expr(games::Column::TemplateId, Expr::value(Option::<Uuid>::None))
        .filter(games::Column::TemplateId.eq(template_id))
        .exec(conn)
        .await?;

    let result = game_templates::Entity::delete_by_id(template_id)
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_public<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    game_templates::Entity::find()
        .filter(game_templates::Column::IsPublic.eq(true))
        .count(conn)
        .await
}

pub async fn count_by_creator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    creator_id: Uuid,
) -> Result<u64, sea_orm::DbErr> {
    game_templates::Entity::find()
        .filter(game_templates::Column::CreatorId.eq(creator_id))
        .count(conn)
        .await
}
