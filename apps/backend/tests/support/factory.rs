//! Seed data for integration tests.

use std::time::SystemTime;

use backend_test_support::unique_helpers::{unique_email, unique_name};
use sea_orm::ConnectionTrait;
use trivia_backend::auth::jwt::issue_pair;
use trivia_backend::domain::client::{
    GameClient, GameTemplateClient, QuestionClient, RoundClient, SettingOptionClient, ThemeClient,
};
use trivia_backend::repos::users::{create_user, User};
use trivia_backend::state::security_config::SecurityConfig;
use trivia_backend::AppError;
use uuid::Uuid;

/// Insert a user with a placeholder password digest.
pub async fn seed_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    prefix: &str,
) -> Result<User, AppError> {
    Ok(create_user(
        conn,
        &unique_name(prefix),
        &unique_email(prefix),
        "not-a-real-digest".to_string(),
    )
    .await?)
}

/// `Authorization` header value for `user_id` signed with the default test secret.
pub fn bearer_for(user_id: Uuid) -> String {
    let pair = issue_pair(user_id, SystemTime::now(), &SecurityConfig::default())
        .expect("issue test token");
    format!("Bearer {}", pair.access)
}

pub fn question(text: &str, points: i32) -> QuestionClient {
    QuestionClient {
        id: Uuid::new_v4(),
        text: text.to_string(),
        answer: format!("answer to {text}"),
        points,
        answered_by: Default::default(),
    }
}

pub fn theme(name: &str, questions: Vec<QuestionClient>) -> ThemeClient {
    ThemeClient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        questions,
    }
}

pub fn round(name: &str, themes: Vec<ThemeClient>) -> RoundClient {
    RoundClient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        ranks: vec![
            SettingOptionClient {
                id: 1,
                label: "100".into(),
                is_selected: true,
            },
            SettingOptionClient {
                id: 2,
                label: "200".into(),
                is_selected: false,
            },
        ],
        time: SettingOptionClient {
            id: 1,
            label: "30s".into(),
            is_selected: true,
        },
        themes,
    }
}

/// Two rounds; the first has two themes of two questions each.
pub fn template_client(name: &str, is_public: bool) -> GameTemplateClient {
    GameTemplateClient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{name} description"),
        is_public,
        rounds: vec![
            round(
                "Round 1",
                vec![
                    theme("Science", vec![question("s100", 100), question("s200", 200)]),
                    theme("History", vec![question("h100", 100), question("h200", 200)]),
                ],
            ),
            round("Round 2", vec![theme("Music", vec![question("m300", 300)])]),
        ],
        creator_id: Uuid::nil(),
    }
}

/// A raw game payload with one round, one theme and two questions.
pub fn game_client(name: &str, invitees: &[Uuid]) -> GameClient {
    GameClient {
        id: Uuid::new_v4(),
        template_id: None,
        name: name.to_string(),
        users: invitees
            .iter()
            .map(|id| trivia_backend::domain::client::GameUserClient {
                id: *id,
                name: String::new(),
                is_admin: false,
                round_score: Default::default(),
            })
            .collect(),
        rounds: vec![round(
            "Round 1",
            vec![theme("Geography", vec![question("g100", 100), question("g200", 200)])],
        )],
        current_round: None,
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
