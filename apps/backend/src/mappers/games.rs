use time::OffsetDateTime;
use uuid::Uuid;

use super::walk_tree;
use crate::domain::client::{
    GameClient, GameTemplateClient, GameUserClient, QuestionClient, RoundClient, ThemeClient,
};
use crate::domain::grouped::Grouped;
use crate::domain::rows::{GameRows, GameUpdate, GameUpdateRows};
use crate::domain::settings::{encode_ranks, encode_round_score, encode_time};
use crate::entities::{answers, game_users, games, questions, rounds, themes};

fn flatten_answers(game_rounds: &[RoundClient]) -> Vec<answers::Model> {
    game_rounds
        .iter()
        .flat_map(|r| &r.themes)
        .flat_map(|t| &t.questions)
        .flat_map(|q| {
            q.answered_by.iter().map(|(user_id, a)| answers::Model {
                question_id: q.id,
                user_id: *user_id,
                is_correct: a.is_correct,
                time_answered: a.time_answered,
            })
        })
        .collect()
}

/// Flatten a client game into rows for creation by `creator`.
///
/// The creator always heads the participant list, whether or not the payload
/// lists them. New games start unfinished regardless of the payload.
pub fn to_create_game(client: &GameClient, creator: Uuid, now: OffsetDateTime) -> GameRows {
    let game = games::Model {
        id: client.id,
        creator_id: creator,
        template_id: client.template_id,
        name: client.name.clone(),
        is_finished: false,
        winner_id: None,
        finish_date: None,
        current_round_id: client.current_round,
        current_question_id: client.current_question,
        current_user_id: client.current_user,
        created_at: now,
    };

    let mut game_rounds = Vec::with_capacity(client.rounds.len());
    let mut themes_by_round = Grouped::new();
    let mut questions_by_theme = Grouped::new();

    walk_tree(
        &client.rounds,
        |round, position| {
            game_rounds.push(rounds::Model {
                id: round.id,
                game_id: client.id,
                name: round.name.clone(),
                time_settings: encode_time(&round.time),
                rank_settings: encode_ranks(&round.ranks),
                position,
            })
        },
        |round_id, theme, position| {
            themes_by_round.push(
                round_id,
                themes::Model {
                    id: theme.id,
                    round_id,
                    name: theme.name.clone(),
                    position,
                },
            )
        },
        |theme_id, question, position| {
            questions_by_theme.push(
                theme_id,
                questions::Model {
                    id: question.id,
                    theme_id,
                    text: question.text.clone(),
                    answer: question.answer.clone(),
                    points: question.points,
                    position,
                },
            )
        },
    );

    let mut participants = vec![creator];
    for user in &client.users {
        if !participants.contains(&user.id) {
            participants.push(user.id);
        }
    }

    GameRows {
        game,
        rounds: game_rounds,
        themes_by_round,
        questions_by_theme,
        participants,
        answers: flatten_answers(&client.rounds),
    }
}

/// Mutable game fields, every user's score map and every nested answer.
///
/// The round/theme/question tree itself is left alone.
pub fn to_update_game(client: &GameClient) -> GameUpdateRows {
    let game = GameUpdate {
        id: client.id,
        name: client.name.clone(),
        current_round_id: client.current_round,
        current_question_id: client.current_question,
        current_user_id: client.current_user,
        winner_id: client.winner.as_ref().map(|w| w.id),
        is_finished: client.is_finished,
    };

    let game_users = client
        .users
        .iter()
        .map(|u| game_users::Model {
            game_id: client.id,
            user_id: u.id,
            round_score: encode_round_score(&u.round_score),
        })
        .collect();

    GameUpdateRows {
        game,
        game_users,
        answers: flatten_answers(&client.rounds),
    }
}

/// Clone a template tree into a fresh game payload.
///
/// Every round, theme and question gets a new id so later template edits
/// never reach the game.
pub fn game_from_template(
    template: &GameTemplateClient,
    name: Option<String>,
    invitees: &[Uuid],
) -> GameClient {
    let rounds = template
        .rounds
        .iter()
        .map(|r| RoundClient {
            id: Uuid::new_v4(),
            name: r.name.clone(),
            ranks: r.ranks.clone(),
            time: r.time.clone(),
            themes: r
                .themes
                .iter()
                .map(|t| ThemeClient {
                    id: Uuid::new_v4(),
                    name: t.name.clone(),
                    questions: t
                        .questions
                        .iter()
                        .map(|q| QuestionClient {
                            id: Uuid::new_v4(),
                            text: q.text.clone(),
                            answer: q.answer.clone(),
                            points: q.points,
                            answered_by: Default::default(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    GameClient {
        id: Uuid::new_v4(),
        template_id: Some(template.id),
        name: name.unwrap_or_else(|| template.name.clone()),
        users: invitees
            .iter()
            .map(|id| GameUserClient {
                id: *id,
                name: String::new(),
                is_admin: false,
                round_score: Default::default(),
            })
            .collect(),
        current_round: rounds.first().map(|r| r.id),
        rounds,
        current_question: None,
        current_user: None,
        is_finished: false,
        winner: None,
        finish_date: None,
        creator_id: Uuid::nil(),
        unconfirmed_users: Vec::new(),
        created_at: 0,
    }
}
