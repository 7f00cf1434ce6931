//! Tree writer: creates and updates whole templates and games.
//!
//! Every statement runs on the caller's connection, normally the request
//! transaction from `with_txn`. Any failure returns early and the caller's
//! rollback undoes everything written so far.

use std::collections::{HashMap, HashSet};

use sea_orm::sea_query::InsertStatement;
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::adapters::games_sea::{self, GameFieldsUpdate};
use crate::adapters::{answers_sea, exec_insert, game_users_sea, invites_sea, templates_sea};
use crate::domain::rows::{GameRows, GameUpdateRows, TemplateRows};
use crate::entities::{game_invites, InviteStatus};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

struct QueuedInsert {
    category: &'static str,
    index: usize,
    stmt: InsertStatement,
}

/// Ordered batch of single-row inserts.
///
/// Each entry is numbered 1-based within its category so a failure can
/// name exactly which row broke ("failed to insert question 3").
#[derive(Default)]
pub struct InsertQueue {
    entries: Vec<QueuedInsert>,
    per_category: HashMap<&'static str, usize>,
}

impl InsertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: &'static str, stmt: InsertStatement) {
        let n = self.per_category.entry(category).or_default();
        *n += 1;
        self.entries.push(QueuedInsert {
            category,
            index: *n,
            stmt,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Execute in push order. Every statement must affect exactly one row.
    pub async fn execute<C: ConnectionTrait + Send + Sync>(
        self,
        conn: &C,
    ) -> Result<(), DomainError> {
        for entry in self.entries {
            let context = format!("failed to insert {} {}", entry.category, entry.index);
            let affected = exec_insert(conn, &entry.stmt)
                .await
                .map_err(|e| DomainError::from(e).with_context(&context))?;
            expect_one_row(affected).map_err(|e| e.with_context(&context))?;
        }
        Ok(())
    }
}

fn expect_one_row(affected: u64) -> Result<(), DomainError> {
    if affected == 1 {
        Ok(())
    } else {
        Err(DomainError::infra(
            InfraErrorKind::Other("RowCount".into()),
            format!("expected 1 row affected, got {affected}"),
        ))
    }
}

/// Insert a template root and its whole tree.
pub async fn create_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: TemplateRows,
) -> Result<(), DomainError> {
    rows.themes_by_round.verify()?;
    rows.questions_by_theme.verify()?;

    let template_id = rows.template.id;
    let affected = templates_sea::insert_template(conn, rows.template)
        .await
        .map_err(|e| DomainError::from(e).with_context("failed to insert template"))?;
    expect_one_row(affected).map_err(|e| e.with_context("failed to insert template"))?;

    for (i, round) in rows.rounds.into_iter().enumerate() {
        let context = format!("failed to insert round {}", i + 1);
        let affected = exec_insert(conn, &templates_sea::insert_round_stmt(round))
            .await
            .map_err(|e| DomainError::from(e).with_context(&context))?;
        expect_one_row(affected).map_err(|e| e.with_context(&context))?;
    }

    let mut queue = InsertQueue::new();
    for theme in rows.themes_by_round.values() {
        queue.push("theme", templates_sea::insert_theme_stmt(theme.clone()));
    }
    for question in rows.questions_by_theme.values() {
        queue.push("question", templates_sea::insert_question_stmt(question.clone()));
    }
    debug!(template_id = %template_id, statements = queue.len(), "writing template tree");
    queue.execute(conn).await
}

/// Replace a template's tree in place.
///
/// Rows in the payload are upserted by id; rows of this template that are
/// missing from the payload are deleted. Ids that already belong to a
/// different template are refused.
pub async fn update_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: TemplateRows,
) -> Result<(), DomainError> {
    rows.themes_by_round.verify()?;
    rows.questions_by_theme.verify()?;

    let template_id = rows.template.id;
    if templates_sea::update_template_root(conn, &rows.template).await? != 1 {
        return Err(DomainError::not_found(
            NotFoundKind::Template,
            format!("Template {template_id} not found"),
        ));
    }

    let round_ids: Vec<Uuid> = rows.rounds.iter().map(|r| r.id).collect();
    let theme_ids: Vec<Uuid> = rows.themes_by_round.values().map(|t| t.id).collect();
    let question_ids: Vec<Uuid> = rows.questions_by_theme.values().map(|q| q.id).collect();

    let foreign = templates_sea::count_foreign_children(
        conn,
        template_id,
        round_ids.clone(),
        theme_ids.clone(),
        question_ids.clone(),
    )
    .await?;
    if foreign > 0 {
        return Err(DomainError::integrity(format!(
            "{foreign} row(s) in the payload belong to another template"
        )));
    }

    for (i, round) in rows.rounds.into_iter().enumerate() {
        let context = format!("failed to upsert round {}", i + 1);
        let affected = exec_insert(conn, &templates_sea::upsert_round_stmt(round))
            .await
            .map_err(|e| DomainError::from(e).with_context(&context))?;
        expect_one_row(affected).map_err(|e| e.with_context(&context))?;
    }

    let mut queue = InsertQueue::new();
    for theme in rows.themes_by_round.values() {
        queue.push("theme", templates_sea::upsert_theme_stmt(theme.clone()));
    }
    for question in rows.questions_by_theme.values() {
        queue.push("question", templates_sea::upsert_question_stmt(question.clone()));
    }
    queue.execute(conn).await?;

    let removed =
        templates_sea::delete_absent_children(conn, template_id, round_ids, theme_ids, question_ids)
            .await?;
    debug!(template_id = %template_id, removed, "template tree replaced");
    Ok(())
}

/// Insert a game, its private tree, participant invites, the creator's
/// membership and any answers already present in the payload.
///
/// The creator's invite is stored as accepted; everyone else starts pending.
pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: GameRows,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    rows.themes_by_round.verify()?;
    rows.questions_by_theme.verify()?;

    let game_id = rows.game.id;
    let creator_id = rows.game.creator_id;
    let affected = games_sea::insert_game(conn, rows.game)
        .await
        .map_err(|e| DomainError::from(e).with_context("failed to insert game"))?;
    expect_one_row(affected).map_err(|e| e.with_context("failed to insert game"))?;

    for (i, round) in rows.rounds.into_iter().enumerate() {
        let context = format!("failed to insert round {}", i + 1);
        let affected = exec_insert(conn, &games_sea::insert_round_stmt(round))
            .await
            .map_err(|e| DomainError::from(e).with_context(&context))?;
        expect_one_row(affected).map_err(|e| e.with_context(&context))?;
    }

    let mut queue = InsertQueue::new();
    for theme in rows.themes_by_round.values() {
        queue.push("theme", games_sea::insert_theme_stmt(theme.clone()));
    }
    for question in rows.questions_by_theme.values() {
        queue.push("question", games_sea::insert_question_stmt(question.clone()));
    }
    for user_id in &rows.participants {
        let status = if *user_id == creator_id {
            InviteStatus::Accepted
        } else {
            InviteStatus::Pending
        };
        queue.push(
            "participant",
            invites_sea::insert_stmt(game_invites::Model {
                id: Uuid::new_v4(),
                game_id,
                user_id: *user_id,
                status,
                created_at: now,
                updated_at: now,
            }),
        );
    }
    queue.push("member", game_users_sea::insert_stmt(game_id, creator_id));
    for answer in rows.answers {
        queue.push("answer", answers_sea::upsert_stmt(answer));
    }

    debug!(game_id = %game_id, statements = queue.len(), "writing game tree");
    queue.execute(conn).await
}

/// Apply a client game update: mutable fields, score maps and answers.
///
/// Only members may be scored, answer, win or be the current user, and
/// every answered question must belong to this game. Marking the game
/// finished requires a member winner. A finished game is immutable.
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: GameUpdateRows,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    let game_id = rows.game.id;
    let members: HashSet<Uuid> = game_users_sea::member_ids(conn, game_id)
        .await?
        .into_iter()
        .collect();

    let require_member = |user_id: Uuid, role: &str| -> Result<(), DomainError> {
        if members.contains(&user_id) {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "{role} {user_id} is not a member of game {game_id}"
            )))
        }
    };

    if let Some(current) = rows.game.current_user_id {
        require_member(current, "current user")?;
    }
    for answer in &rows.answers {
        require_member(answer.user_id, "answering user")?;
    }

    let question_ids: Vec<Uuid> = rows
        .answers
        .iter()
        .map(|a| a.question_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let expected = question_ids.len() as u64;
    if expected > 0 {
        let found = games_sea::count_questions_in_game(conn, game_id, question_ids).await?;
        if found != expected {
            return Err(DomainError::integrity(format!(
                "{} answered question(s) do not belong to game {game_id}",
                expected - found
            )));
        }
    }

    let finish = if rows.game.is_finished {
        let Some(winner_id) = rows.game.winner_id else {
            return Err(DomainError::validation(format!(
                "finishing game {game_id} requires a winner"
            )));
        };
        require_member(winner_id, "winner")?;
        Some((winner_id, now))
    } else {
        None
    };

    let affected = games_sea::update_unfinished(
        conn,
        GameFieldsUpdate {
            id: game_id,
            name: rows.game.name,
            current_round_id: rows.game.current_round_id,
            current_question_id: rows.game.current_question_id,
            current_user_id: rows.game.current_user_id,
            finish,
        },
    )
    .await?;
    if affected == 0 {
        return Err(match games_sea::find_by_id(conn, game_id).await? {
            None => DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found")),
            Some(_) => DomainError::conflict(
                ConflictKind::GameAlreadyFinished,
                format!("Game {game_id} is already finished"),
            ),
        });
    }

    for (i, member) in rows.game_users.into_iter().enumerate() {
        let user_id = member.user_id;
        if game_users_sea::update_round_score(conn, member).await? != 1 {
            return Err(DomainError::not_found(
                NotFoundKind::Membership,
                format!("user {user_id} is not a member of game {game_id}"),
            )
            .with_context(format!("failed to update scores for participant {}", i + 1)));
        }
    }

    let mut queue = InsertQueue::new();
    for answer in rows.answers {
        queue.push("answer", answers_sea::upsert_stmt(answer));
    }
    queue.execute(conn).await
}
