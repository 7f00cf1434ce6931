//! Aggregation reader: joined tree queries folded back into client trees.
//!
//! Every call allocates its own fold buffers. Rounds are ordered by
//! position, themes by position, questions by points then position.

use std::collections::{BTreeMap, HashMap, HashSet};

use sea_orm::prelude::Json;
use sea_orm::ConnectionTrait;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::adapters::games_sea::{self, GameTreeRow};
use crate::adapters::templates_sea::{self, TemplateTreeRow};
use crate::adapters::{answers_sea, game_users_sea, invites_sea, users_sea};
use crate::domain::client::{
    AnsweredByClient, GameClient, GameTemplateClient, GameUserClient, QuestionClient,
    RoundClient, ThemeClient, UnconfirmedUserClient, UserClient,
};
use crate::domain::filter::{GameFilter, TemplateFilter};
use crate::domain::grouped::Grouped;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::settings::{decode_ranks, decode_round_score, decode_time, ranks_to_client};
use crate::errors::domain::{DomainError, NotFoundKind};

/// Unix milliseconds, as sent to clients.
pub fn to_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

struct RoundNode {
    id: Uuid,
    name: String,
    time_settings: Option<Json>,
    rank_settings: Option<Json>,
    position: i32,
}

struct ThemeNode {
    id: Uuid,
    name: String,
    position: i32,
}

struct QuestionNode {
    id: Uuid,
    text: String,
    answer: String,
    points: i32,
    position: i32,
}

/// Flat row stream -> parent-keyed child buckets, deduplicating repeated
/// parent columns. A NULL child column means "no children yet".
#[derive(Default)]
struct TreeFold {
    rounds: Grouped<Uuid, RoundNode>,
    themes: Grouped<Uuid, ThemeNode>,
    questions: Grouped<Uuid, QuestionNode>,
    seen: HashSet<Uuid>,
}

impl TreeFold {
    fn add(
        &mut self,
        root_id: Uuid,
        round: Option<RoundNode>,
        theme: Option<ThemeNode>,
        question: Option<QuestionNode>,
    ) {
        let Some(round) = round else { return };
        let round_id = round.id;
        if self.seen.insert(round_id) {
            self.rounds.push(root_id, round);
        }

        let Some(theme) = theme else { return };
        let theme_id = theme.id;
        if self.seen.insert(theme_id) {
            self.themes.push(round_id, theme);
        }

        if let Some(question) = question {
            if self.seen.insert(question.id) {
                self.questions.push(theme_id, question);
            }
        }
    }

    fn question_ids(&self) -> Vec<Uuid> {
        self.questions.values().map(|q| q.id).collect()
    }

    fn rounds_for(
        &self,
        root_id: Uuid,
        answers: &HashMap<Uuid, BTreeMap<Uuid, AnsweredByClient>>,
    ) -> Vec<RoundClient> {
        let mut rounds: Vec<&RoundNode> = self.rounds.get(&root_id).iter().collect();
        rounds.sort_by_key(|r| r.position);

        rounds
            .into_iter()
            .map(|r| {
                let mut themes: Vec<&ThemeNode> = self.themes.get(&r.id).iter().collect();
                themes.sort_by_key(|t| t.position);

                RoundClient {
                    id: r.id,
                    name: r.name.clone(),
                    ranks: ranks_to_client(decode_ranks(
                        r.id,
                        r.rank_settings.as_ref().unwrap_or(&Value::Null),
                    )),
                    time: decode_time(r.id, r.time_settings.as_ref().unwrap_or(&Value::Null))
                        .into(),
                    themes: themes
                        .into_iter()
                        .map(|t| self.theme_client(t, answers))
                        .collect(),
                }
            })
            .collect()
    }

    fn theme_client(
        &self,
        theme: &ThemeNode,
        answers: &HashMap<Uuid, BTreeMap<Uuid, AnsweredByClient>>,
    ) -> ThemeClient {
        let mut questions: Vec<&QuestionNode> = self.questions.get(&theme.id).iter().collect();
        questions.sort_by_key(|q| (q.points, q.position));

        ThemeClient {
            id: theme.id,
            name: theme.name.clone(),
            questions: questions
                .into_iter()
                .map(|q| QuestionClient {
                    id: q.id,
                    text: q.text.clone(),
                    answer: q.answer.clone(),
                    points: q.points,
                    answered_by: answers.get(&q.id).cloned().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

macro_rules! tree_nodes {
    ($row:expr) => {{
        let row = $row;
        let round = match (row.round_id, row.round_name.as_ref()) {
            (Some(id), Some(name)) => Some(RoundNode {
                id,
                name: name.clone(),
                time_settings: row.round_time_settings.clone(),
                rank_settings: row.round_rank_settings.clone(),
                position: row.round_position.unwrap_or_default(),
            }),
            _ => None,
        };
        let theme = match (row.theme_id, row.theme_name.as_ref()) {
            (Some(id), Some(name)) => Some(ThemeNode {
                id,
                name: name.clone(),
                position: row.theme_position.unwrap_or_default(),
            }),
            _ => None,
        };
        let question = row.question_id.map(|id| QuestionNode {
            id,
            text: row.question_text.clone().unwrap_or_default(),
            answer: row.question_answer.clone().unwrap_or_default(),
            points: row.question_points.unwrap_or_default(),
            position: row.question_position.unwrap_or_default(),
        });
        (round, theme, question)
    }};
}

/// Fold template tree rows into clients, in `order`.
fn fold_templates(rows: &[TemplateTreeRow], order: &[Uuid]) -> Vec<GameTemplateClient> {
    let mut roots: HashMap<Uuid, GameTemplateClient> = HashMap::new();
    let mut fold = TreeFold::default();

    for row in rows {
        roots.entry(row.template_id).or_insert_with(|| GameTemplateClient {
            id: row.template_id,
            name: row.template_name.clone(),
            description: row.template_description.clone(),
            is_public: row.template_is_public,
            rounds: Vec::new(),
            creator_id: row.template_creator_id,
        });
        let (round, theme, question) = tree_nodes!(row);
        fold.add(row.template_id, round, theme, question);
    }

    let no_answers = HashMap::new();
    order
        .iter()
        .filter_map(|id| {
            roots.remove(id).map(|mut t| {
                t.rounds = fold.rounds_for(t.id, &no_answers);
                t
            })
        })
        .collect()
}

/// Single template by id, or NotFound.
pub async fn fetch_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
) -> Result<GameTemplateClient, DomainError> {
    let rows = templates_sea::tree_rows(conn, vec![template_id]).await?;
    fold_templates(&rows, &[template_id])
        .pop()
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Template,
                format!("Template {template_id} not found"),
            )
        })
}

pub async fn list_templates<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: TemplateFilter,
    page: &PageRequest,
) -> Result<Page<GameTemplateClient>, DomainError> {
    let (ids, total) = templates_sea::page_ids(conn, filter, page).await?;
    if ids.is_empty() {
        return Ok(Page::empty(page, total));
    }

    let rows = templates_sea::tree_rows(conn, ids.clone()).await?;
    Ok(Page {
        data: fold_templates(&rows, &ids),
        total,
        offset: page.offset,
        limit: page.limit,
    })
}

/// Fold game tree rows plus the per-page side queries into clients.
async fn assemble_games<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[Uuid],
    with_unconfirmed: bool,
) -> Result<Vec<GameClient>, DomainError> {
    let rows: Vec<GameTreeRow> = games_sea::tree_rows(conn, ids.to_vec()).await?;

    let mut roots: HashMap<Uuid, GameClient> = HashMap::new();
    let mut winners: HashMap<Uuid, Uuid> = HashMap::new();
    let mut fold = TreeFold::default();

    for row in &rows {
        roots.entry(row.game_id).or_insert_with(|| {
            if let Some(winner_id) = row.game_winner_id {
                winners.insert(row.game_id, winner_id);
            }
            GameClient {
                id: row.game_id,
                template_id: row.game_template_id,
                name: row.game_name.clone(),
                users: Vec::new(),
                rounds: Vec::new(),
                current_round: row.game_current_round_id,
                current_question: row.game_current_question_id,
                current_user: row.game_current_user_id,
                is_finished: row.game_is_finished,
                winner: None,
                finish_date: row.game_finish_date.map(to_millis),
                creator_id: row.game_creator_id,
                unconfirmed_users: Vec::new(),
                created_at: to_millis(row.game_created_at),
            }
        });
        let (round, theme, question) = tree_nodes!(row);
        fold.add(row.game_id, round, theme, question);
    }

    let mut answers: HashMap<Uuid, BTreeMap<Uuid, AnsweredByClient>> = HashMap::new();
    for a in answers_sea::find_by_question_ids(conn, fold.question_ids()).await? {
        answers.entry(a.question_id).or_default().insert(
            a.user_id,
            AnsweredByClient {
                is_correct: a.is_correct,
                time_answered: a.time_answered,
            },
        );
    }

    let mut members: HashMap<Uuid, Vec<GameUserClient>> = HashMap::new();
    for (member, user) in game_users_sea::find_with_users(conn, ids.to_vec()).await? {
        let is_admin = roots
            .get(&member.game_id)
            .is_some_and(|g| g.creator_id == member.user_id);
        members.entry(member.game_id).or_default().push(GameUserClient {
            id: member.user_id,
            name: user.map(|u| u.name).unwrap_or_default(),
            is_admin,
            round_score: decode_round_score(member.user_id, &member.round_score),
        });
    }

    let mut unconfirmed: HashMap<Uuid, Vec<UnconfirmedUserClient>> = HashMap::new();
    if with_unconfirmed {
        for (invite, user) in invites_sea::unconfirmed_for_games(conn, ids.to_vec()).await? {
            unconfirmed
                .entry(invite.game_id)
                .or_default()
                .push(UnconfirmedUserClient {
                    id: invite.user_id,
                    name: user.map(|u| u.name).unwrap_or_default(),
                    status: invite.status,
                });
        }
    }

    let winner_ids: Vec<Uuid> = winners.values().copied().collect::<HashSet<_>>().into_iter().collect();
    let winner_names: HashMap<Uuid, String> = users_sea::names_by_id(conn, winner_ids)
        .await?
        .into_iter()
        .collect();

    Ok(ids
        .iter()
        .filter_map(|id| roots.remove(id))
        .map(|mut game| {
            game.rounds = fold.rounds_for(game.id, &answers);
            game.users = members.remove(&game.id).unwrap_or_default();
            game.unconfirmed_users = unconfirmed.remove(&game.id).unwrap_or_default();
            game.winner = winners.get(&game.id).map(|winner_id| UserClient {
                id: *winner_id,
                name: winner_names.get(winner_id).cloned().unwrap_or_default(),
            });
            game
        })
        .collect())
}

/// Single game by id, or NotFound. Includes pending/declined invitees.
pub async fn fetch_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: Uuid,
) -> Result<GameClient, DomainError> {
    assemble_games(conn, &[game_id], true)
        .await?
        .pop()
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
        })
}

pub async fn list_games<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: GameFilter,
    page: &PageRequest,
) -> Result<Page<GameClient>, DomainError> {
    let (ids, total) = games_sea::page_ids(conn, filter, page).await?;
    if ids.is_empty() {
        return Ok(Page::empty(page, total));
    }

    Ok(Page {
        data: assemble_games(conn, &ids, filter.includes_unconfirmed()).await?,
        total,
        offset: page.offset,
        limit: page.limit,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(
        template_id: Uuid,
        round: Option<(Uuid, i32)>,
        theme: Option<(Uuid, i32)>,
        question: Option<(Uuid, i32, i32)>,
    ) -> TemplateTreeRow {
        TemplateTreeRow {
            template_id,
            template_name: "T".into(),
            template_description: String::new(),
            template_is_public: false,
            template_creator_id: Uuid::nil(),
            template_created_at: OffsetDateTime::UNIX_EPOCH,
            round_id: round.map(|r| r.0),
            round_name: round.map(|_| "R".to_string()),
            round_time_settings: round.map(|_| json!({"id": 1, "label": "30s", "is_selected": true})),
            round_rank_settings: round.map(|_| json!("corrupt")),
            round_position: round.map(|r| r.1),
            theme_id: theme.map(|t| t.0),
            theme_name: theme.map(|_| "Th".to_string()),
            theme_position: theme.map(|t| t.1),
            question_id: question.map(|q| q.0),
            question_text: question.map(|_| "q".to_string()),
            question_answer: question.map(|_| "a".to_string()),
            question_points: question.map(|q| q.1),
            question_position: question.map(|q| q.2),
        }
    }

    #[test]
    fn fold_dedups_parents_and_orders_children() {
        let t = Uuid::new_v4();
        let r = Uuid::new_v4();
        let (th0, th1) = (Uuid::new_v4(), Uuid::new_v4());
        let (q_cheap, q_mid_late, q_mid_early) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let rows = vec![
            row(t, Some((r, 0)), Some((th1, 1)), None),
            row(t, Some((r, 0)), Some((th0, 0)), Some((q_mid_late, 200, 2))),
            row(t, Some((r, 0)), Some((th0, 0)), Some((q_cheap, 100, 5))),
            row(t, Some((r, 0)), Some((th0, 0)), Some((q_mid_early, 200, 0))),
        ];

        let templates = fold_templates(&rows, &[t]);
        assert_eq!(templates.len(), 1);
        let round = &templates[0].rounds[0];
        assert_eq!(templates[0].rounds.len(), 1);
        assert_eq!(round.themes.iter().map(|t| t.id).collect::<Vec<_>>(), vec![th0, th1]);
        assert_eq!(
            round.themes[0].questions.iter().map(|q| q.id).collect::<Vec<_>>(),
            vec![q_cheap, q_mid_early, q_mid_late]
        );
        assert!(round.themes[1].questions.is_empty());
        // corrupt rank blob degrades to no ranks
        assert!(round.ranks.is_empty());
        assert_eq!(round.time.label, "30s");
    }

    #[test]
    fn fold_keeps_requested_order_and_empty_roots() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![row(a, None, None, None), row(b, None, None, None)];

        let templates = fold_templates(&rows, &[b, a]);
        assert_eq!(templates.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b, a]);
        assert!(templates[0].rounds.is_empty());
    }

    #[test]
    fn millis_conversion() {
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(to_millis(at), 1_700_000_000_000);
    }
}
