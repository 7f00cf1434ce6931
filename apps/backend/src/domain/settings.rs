//! JSON blobs stored on round rows and game memberships.
//!
//! Stored keys are snake_case. A blob that fails to decode is replaced by
//! the empty default and logged; reads never fail on a bad blob.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::error;
use uuid::Uuid;

use crate::domain::client::SettingOptionClient;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSetting {
    pub id: u16,
    pub label: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSetting {
    pub id: u16,
    pub label: String,
    pub is_selected: bool,
}

fn decode_or_default<T: DeserializeOwned + Default>(what: &str, owner: Uuid, value: &Value) -> T {
    if value.is_null() {
        return T::default();
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => v,
        Err(e) => {
            error!(owner = %owner, error = %e, "failed to decode {what}; using default");
            T::default()
        }
    }
}

pub fn decode_time(round_id: Uuid, value: &Value) -> TimeSetting {
    decode_or_default("time settings", round_id, value)
}

pub fn decode_ranks(round_id: Uuid, value: &Value) -> Vec<RankSetting> {
    decode_or_default("rank settings", round_id, value)
}

pub fn decode_round_score(user_id: Uuid, value: &Value) -> BTreeMap<Uuid, i32> {
    decode_or_default("round scores", user_id, value)
}

pub fn encode_time(time: &SettingOptionClient) -> Value {
    json!({ "id": time.id, "label": time.label, "is_selected": time.is_selected })
}

/// Stored list order is the display order.
pub fn encode_ranks(ranks: &[SettingOptionClient]) -> Value {
    Value::Array(
        ranks
            .iter()
            .map(|r| json!({ "id": r.id, "label": r.label, "is_selected": r.is_selected }))
            .collect(),
    )
}

pub fn encode_round_score(scores: &BTreeMap<Uuid, i32>) -> Value {
    Value::Object(
        scores
            .iter()
            .map(|(round_id, score)| (round_id.to_string(), json!(score)))
            .collect::<Map<String, Value>>(),
    )
}

impl From<TimeSetting> for SettingOptionClient {
    fn from(t: TimeSetting) -> Self {
        Self {
            id: t.id,
            label: t.label,
            is_selected: t.is_selected,
        }
    }
}

/// Client rank ids are positional: `index + 1`.
pub fn ranks_to_client(ranks: Vec<RankSetting>) -> Vec<SettingOptionClient> {
    ranks
        .into_iter()
        .enumerate()
        .map(|(i, r)| SettingOptionClient {
            id: u16::try_from(i + 1).unwrap_or(u16::MAX),
            label: r.label,
            is_selected: r.is_selected,
        })
        .collect()
}
