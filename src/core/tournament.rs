use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::prelude::FromRow;

pub const DEFAULT_TOURNAMENT_NAME: &str = "Untitled Tournament";

/// A row of the tournament listing
#[derive(PartialEq, Eq, Debug, FromRow, Clone, Serialize, Deserialize)]
pub struct TournamentSummary {
    /// Unique tournament ID
    pub id: i64,

    /// Display name extracted from the saved snapshot
    pub name: String,

    /// Last save time in Unix milliseconds
    pub updated_at: i64,
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Picks the display name of a snapshot.
///
/// Lookup order is `tournamentName`, then `auctionData.tournamentName`, then
/// [`DEFAULT_TOURNAMENT_NAME`]. Only non-empty strings are accepted.
pub fn tournament_name(payload: &Map<String, Value>) -> String {
    [
        payload.get("tournamentName"),
        payload
            .get("auctionData")
            .and_then(|data| data.get("tournamentName")),
    ]
    .into_iter()
    .find_map(non_empty_str)
    .unwrap_or(DEFAULT_TOURNAMENT_NAME)
    .to_owned()
}

/// The tournament ID a client sent along with its snapshot, if any.
///
/// Accepts positive integers and strings holding one. Everything else,
/// including `0` and `null`, means the snapshot has no ID yet.
pub fn payload_id(payload: &Map<String, Value>) -> Option<i64> {
    match payload.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}

/// Overwrites the `id` field of a stored snapshot with its row ID.
pub fn with_id(mut state: Value, id: i64) -> Value {
    if let Some(fields) = state.as_object_mut() {
        fields.insert("id".to_owned(), Value::from(id));
    }
    state
}
