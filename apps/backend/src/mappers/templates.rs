use time::OffsetDateTime;
use uuid::Uuid;

use super::walk_tree;
use crate::domain::client::GameTemplateClient;
use crate::domain::grouped::Grouped;
use crate::domain::rows::TemplateRows;
use crate::domain::settings::{encode_ranks, encode_time};
use crate::entities::{game_templates, template_questions, template_rounds, template_themes};

/// Flatten a client template into rows owned by `creator`.
///
/// Used for both create and full-tree update; positions are payload indices.
pub fn to_create_template(
    client: &GameTemplateClient,
    creator: Uuid,
    now: OffsetDateTime,
) -> TemplateRows {
    let template = game_templates::Model {
        id: client.id,
        creator_id: creator,
        name: client.name.clone(),
        description: client.description.clone(),
        is_public: client.is_public,
        created_at: now,
    };

    let mut rounds = Vec::with_capacity(client.rounds.len());
    let mut themes_by_round = Grouped::new();
    let mut questions_by_theme = Grouped::new();

    walk_tree(
        &client.rounds,
        |round, position| {
            rounds.push(template_rounds::Model {
                id: round.id,
                template_id: client.id,
                name: round.name.clone(),
                time_settings: encode_time(&round.time),
                rank_settings: encode_ranks(&round.ranks),
                position,
            })
        },
        |round_id, theme, position| {
            themes_by_round.push(
                round_id,
                template_themes::Model {
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
                template_questions::Model {
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

    TemplateRows {
        template,
        rounds,
        themes_by_round,
        questions_by_theme,
    }
}
