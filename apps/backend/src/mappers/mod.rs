//! Pure translation from client trees to flat relational rows.
//!
//! Mappers do no I/O and never fail; the writer checks parent ids before
//! anything is executed.

pub mod games;
pub mod templates;

pub use games::{game_from_template, to_create_game, to_update_game};
pub use templates::to_create_template;

use uuid::Uuid;

use crate::domain::client::{QuestionClient, RoundClient, ThemeClient};

/// Visit a round/theme/question tree in payload order with sibling positions.
///
/// `on_theme` receives the owning round id, `on_question` the owning theme id.
pub(crate) fn walk_tree<'a>(
    rounds: &'a [RoundClient],
    mut on_round: impl FnMut(&'a RoundClient, i32),
    mut on_theme: impl FnMut(Uuid, &'a ThemeClient, i32),
    mut on_question: impl FnMut(Uuid, &'a QuestionClient, i32),
) {
    for (r_pos, round) in (0..).zip(rounds) {
        on_round(round, r_pos);
        for (t_pos, theme) in (0..).zip(&round.themes) {
            on_theme(round.id, theme, t_pos);
            for (q_pos, question) in (0..).zip(&theme.questions) {
                on_question(theme.id, question, q_pos);
            }
        }
    }
}
