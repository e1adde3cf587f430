use serde::{Deserialize, Serialize};

/// Persisted record for one game id.
///
/// The `state` payload is an opaque JSON value supplied by the client; the
/// backend never inspects or validates its internal structure, so any shape a
/// client chooses to serialize round-trips untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRecordEntity {
    /// Caller-supplied identifier, unique per game.
    pub id: String,
    /// Most recently saved game state blob.
    pub state: serde_json::Value,
}

impl GameRecordEntity {
    /// Bundle an id and a state blob into a record.
    pub fn new(id: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            state,
        }
    }
}
