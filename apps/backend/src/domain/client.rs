//! Client-facing nested JSON shapes (camelCase on the wire).
//!
//! Timestamps are Unix milliseconds. Ids omitted by the client, or sent as
//! the nil UUID, become fresh v4 UUIDs. `creatorId` defaults to nil and is
//! overwritten by the service with the caller's id.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::InviteStatus;

fn is_false(b: &bool) -> bool {
    !*b
}

fn id_or_new<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
    let id = Uuid::deserialize(deserializer)?;
    Ok(if id.is_nil() { Uuid::new_v4() } else { id })
}

/// One entry of a round's time or rank option set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingOptionClient {
    #[serde(default)]
    pub id: u16,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_selected: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredByClient {
    pub is_correct: bool,
    #[serde(default)]
    pub time_answered: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionClient {
    #[serde(default = "Uuid::new_v4", deserialize_with = "id_or_new")]
    pub id: Uuid,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub answer: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub points: i32,
    /// user id -> answer
    #[serde(default)]
    pub answered_by: BTreeMap<Uuid, AnsweredByClient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThemeClient {
    #[serde(default = "Uuid::new_v4", deserialize_with = "id_or_new")]
    pub id: Uuid,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(nested)]
    #[serde(default)]
    pub questions: Vec<QuestionClient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoundClient {
    #[serde(default = "Uuid::new_v4", deserialize_with = "id_or_new")]
    pub id: Uuid,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default)]
    pub ranks: Vec<SettingOptionClient>,
    #[serde(default)]
    pub time: SettingOptionClient,
    #[validate(nested)]
    #[serde(default)]
    pub themes: Vec<ThemeClient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameTemplateClient {
    #[serde(default = "Uuid::new_v4", deserialize_with = "id_or_new")]
    pub id: Uuid,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[validate(nested)]
    #[serde(default)]
    pub rounds: Vec<RoundClient>,
    #[serde(default)]
    pub creator_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUserClient {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    /// True for the game's creator.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_admin: bool,
    /// round id -> score
    #[serde(default)]
    pub round_score: BTreeMap<Uuid, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClient {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnconfirmedUserClient {
    pub id: Uuid,
    pub name: String,
    pub status: InviteStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameClient {
    #[serde(default = "Uuid::new_v4", deserialize_with = "id_or_new")]
    pub id: Uuid,
    #[serde(default)]
    pub template_id: Option<Uuid>,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default)]
    pub users: Vec<GameUserClient>,
    #[validate(nested)]
    #[serde(default)]
    pub rounds: Vec<RoundClient>,
    #[serde(default)]
    pub current_round: Option<Uuid>,
    #[serde(default)]
    pub current_question: Option<Uuid>,
    #[serde(default)]
    pub current_user: Option<Uuid>,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub winner: Option<UserClient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<i64>,
    #[serde(default)]
    pub creator_id: Uuid,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unconfirmed_users: Vec<UnconfirmedUserClient>,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInviteClient {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub status: InviteStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub game_name: String,
    pub game_creator_name: String,
}
