//! SeaORM adapter for games and their round/theme/question trees.

use sea_orm::sea_query::{Expr, Func, InsertStatement, LikeExpr, Query, SelectStatement};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::like_pattern;
use crate::domain::filter::GameFilter;
use crate::domain::pagination::PageRequest;
use crate::entities::{game_templates, game_users, games, questions, rounds, themes};

pub mod dto;

pub use dto::{GameFieldsUpdate, GameTreeRow};

fn member_game_ids(user_id: Uuid) -> SelectStatement {
    Query::select()
        .column(game_users::Column::GameId)
        .from(game_users::Entity)
        .and_where(game_users::Column::UserId.eq(user_id))
        .to_owned()
}

fn public_template_ids() -> SelectStatement {
    Query::select()
        .column(game_templates::Column::Id)
        .from(game_templates::Entity)
        .and_where(game_templates::Column::IsPublic.eq(true))
        .to_owned()
}

fn filter_condition(filter: GameFilter, query: Option<&str>) -> Condition {
    let mut cond = match filter {
        GameFilter::Id(id) => Condition::all().add(games::Column::Id.eq(id)),
        GameFilter::CreatorId(id) => Condition::all().add(games::Column::CreatorId.eq(id)),
        GameFilter::User(user_id) => Condition::all()
            .add(games::Column::Id.in_subquery(member_game_ids(user_id)))
            .add(games::Column::IsFinished.eq(false)),
        GameFilter::UserFinished(user_id) => Condition::all()
            .add(games::Column::Id.in_subquery(member_game_ids(user_id)))
            .add(games::Column::IsFinished.eq(true)),
        GameFilter::PublicUnfinished => Condition::all()
            .add(games::Column::TemplateId.in_subquery(public_template_ids()))
            .add(games::Column::IsFinished.eq(false)),
        GameFilter::PublicFinished => Condition::all()
            .add(games::Column::TemplateId.in_subquery(public_template_ids()))
            .add(games::Column::IsFinished.eq(true)),
        GameFilter::All => Condition::all(),
    };

    if let Some(q) = query {
        cond = cond.add(
            Expr::expr(Func::lower(Expr::col((games::Entity, games::Column::Name))))
                .like(LikeExpr::new(like_pattern(q)).escape('\\')),
        );
    }
    cond
}

/// Ids of one page of games (newest first) plus the total match count.
pub async fn page_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: GameFilter,
    page: &PageRequest,
) -> Result<(Vec<Uuid>, u64), sea_orm::DbErr> {
    let base = games::Entity::find()
        .select_only()
        .column(games::Column::Id)
        .filter(filter_condition(filter, page.query.as_deref()));

    let total = base.clone().count(conn).await?;
    let ids = base
        .order_by_desc(games::Column::CreatedAt)
        .order_by_asc(games::Column::Id)
        .offset(page.offset)
        .limit(page.limit)
        .into_tuple::<Uuid>()
        .all(conn)
        .await?;

    Ok((ids, total))
}

pub async fn count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: GameFilter,
) -> Result<u64, sea_orm::DbErr> {
    games::Entity::find()
        .filter(filter_condition(filter, None))
        .count(conn)
        .await
}

/// The LEFT JOIN tree for `game_ids`, one row per deepest node.
pub async fn tree_rows<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_ids: Vec<Uuid>,
) -> Result<Vec<GameTreeRow>, sea_orm::DbErr> {
    if game_ids.is_empty() {
        return Ok(Vec::new());
    }

    games::Entity::find()
        .select_only()
        .column_as(games::Column::Id, "game_id")
        .column_as(games::Column::Name, "game_name")
        .column_as(games::Column::CreatorId, "game_creator_id")
        .column_as(games::Column::TemplateId, "game_template_id")
        .column_as(games::Column::IsFinished, "game_is_finished")
        .column_as(games::Column::WinnerId, "game_winner_id")
        .column_as(games::Column::FinishDate, "game_finish_date")
        .column_as(games::Column::CurrentRoundId, "game_current_round_id")
        .column_as(games::Column::CurrentQuestionId, "game_current_question_id")
        .column_as(games::Column::CurrentUserId, "game_current_user_id")
        .column_as(games::Column::CreatedAt, "game_created_at")
        .column_as(rounds::Column::Id, "round_id")
        .column_as(rounds::Column::Name, "round_name")
        .column_as(rounds::Column::TimeSettings, "round_time_settings")
        .column_as(rounds::Column::RankSettings, "round_rank_settings")
        .column_as(rounds::Column::Position, "round_position")
        .column_as(themes::Column::Id, "theme_id")
        .column_as(themes::Column::Name, "theme_name")
        .column_as(themes::Column::Position, "theme_position")
        .column_as(questions::Column::Id, "question_id")
        .column_as(questions::Column::Text, "question_text")
        .column_as(questions::Column::Answer, "question_answer")
        .column_as(questions::Column::Points, "question_points")
        .column_as(questions::Column::Position, "question_position")
        .join(JoinType::LeftJoin, games::Relation::Rounds.def())
        .join(JoinType::LeftJoin, rounds::Relation::Themes.def())
        .join(JoinType::LeftJoin, themes::Relation::Questions.def())
        .filter(games::Column::Id.is_in(game_ids))
        .order_by_desc(games::Column::CreatedAt)
        .order_by_asc(games::Column::Id)
        .order_by_asc(rounds::Column::Position)
        .order_by_asc(themes::Column::Position)
        .order_by_asc(questions::Column::Points)
        .into_model::<GameTreeRow>()
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

pub async fn insert_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: games::Model,
) -> Result<u64, sea_orm::DbErr> {
    games::Entity::insert(game.into_active_model())
        .exec_without_returning(conn)
        .await
}

pub fn insert_round_stmt(round: rounds::Model) -> InsertStatement {
    rounds::Entity::insert(round.into_active_model()).into_query()
}

pub fn insert_theme_stmt(theme: themes::Model) -> InsertStatement {
    themes::Entity::insert(theme.into_active_model()).into_query()
}

pub fn insert_question_stmt(question: questions::Model) -> InsertStatement {
    questions::Entity::insert(question.into_active_model()).into_query()
}

/// Apply mutable fields only while the game is unfinished.
///
/// Returns rows affected: 0 means missing or already finished.
pub async fn update_unfinished<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameFieldsUpdate,
) -> Result<u64, sea_orm::DbErr> {
    let mut update = games::Entity::update_many()
        .col_expr(games::Column::Name, Expr::value(dto.name))
        .col_expr(games::Column::CurrentRoundId, Expr::value(dto.current_round_id))
        .col_expr(
            games::Column::CurrentQuestionId,
            Expr::value(dto.current_question_id),
        )
        .col_expr(games::Column::CurrentUserId, Expr::value(dto.current_user_id));

    if let Some((winner_id, finished_at)) = dto.finish {
        update = update
            .col_expr(games::Column::IsFinished, Expr::value(true))
            .col_expr(games::Column::WinnerId, Expr::value(Some(winner_id)))
            .col_expr(games::Column::FinishDate, Expr::value(Some(finished_at)));
    }

    let result = update
        .filter(games::Column::Id.eq(dto.id))
        .filter(games::Column::IsFinished.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Compare-and-swap `is_finished` false -> true, recording winner and time.
pub async fn finish<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    winner_id: Uuid,
    finished_at: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let result = games::Entity::update_many()
        .col_expr(games::Column::IsFinished, Expr::value(true))
        .col_expr(games::Column::WinnerId, Expr::value(Some(winner_id)))
        .col_expr(games::Column::FinishDate, Expr::value(Some(finished_at)))
        .filter(games::Column::Id.eq(game_id))
        .filter(games::Column::IsFinished.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// How many of `question_ids` belong to `game_id`.
pub async fn count_questions_in_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
    question_ids: Vec<Uuid>,
) -> Result<u64, sea_orm::DbErr> {
    if question_ids.is_empty() {
        return Ok(0);
    }
    questions::Entity::find()
        .join(JoinType::InnerJoin, questions::Relation::Theme.def())
        .join(JoinType::InnerJoin, themes::Relation::Round.def())
        .filter(rounds::Column::GameId.eq(game_id))
        .filter(questions::Column::Id.is_in(question_ids))
        .count(conn)
        .await
}
