use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{dao::models::GameRecordEntity, dto::validation::validate_game_id};

/// Payload used to save a game state blob.
///
/// Both fields are deserialized as optional so a missing (or `null`) field
/// reaches validation instead of being rejected by the extractor with an
/// opaque message.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveGameRequest {
    /// Caller-supplied identifier, unique per game.
    #[schema(value_type = String)]
    pub game_id: Option<String>,
    /// Arbitrary JSON value holding the serialized game state.
    #[schema(value_type = Object)]
    pub game_state: Option<serde_json::Value>,
}

impl Validate for SaveGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.game_id {
            None => errors.add("gameId", missing_field("gameId")),
            Some(id) => {
                if let Err(e) = validate_game_id(id) {
                    errors.add("gameId", e);
                }
            }
        }

        if self.game_state.is_none() {
            errors.add("gameState", missing_field("gameState"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl SaveGameRequest {
    /// Validate the payload and unwrap its fields.
    pub fn into_parts(self) -> Result<(String, serde_json::Value), ValidationErrors> {
        self.validate()?;
        match (self.game_id, self.game_state) {
            (Some(id), Some(state)) => Ok((id, state)),
            // Unreachable after validate(), but the type system cannot see it.
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("gameId", missing_field("gameId"));
                Err(errors)
            }
        }
    }
}

fn missing_field(field: &'static str) -> ValidationError {
    let mut err = ValidationError::new("required");
    err.message = Some(format!("{field} is required").into());
    err
}

/// Query parameters accepted by the load operation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadGameQuery {
    /// Identifier of the game to load.
    #[schema(value_type = String)]
    pub game_id: Option<String>,
}

/// Acknowledgement returned once a game state has been persisted.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveGameResponse {
    /// Human readable confirmation.
    pub message: String,
}

impl SaveGameResponse {
    /// The acknowledgement sent after every successful save.
    pub fn saved() -> Self {
        Self {
            message: "Game state saved successfully!".to_string(),
        }
    }
}

/// Raw stored record returned by the load operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameRecordResponse {
    /// The game state blob exactly as it was saved.
    #[schema(value_type = Object)]
    pub state: serde_json::Value,
}

impl From<GameRecordEntity> for GameRecordResponse {
    fn from(value: GameRecordEntity) -> Self {
        Self { state: value.state }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(body: serde_json::Value) -> SaveGameRequest {
        serde_json::from_value(body).expect("deserialize request")
    }

    #[test]
    fn valid_payload_passes() {
        let req = request(json!({"gameId": "abc123", "gameState": {"turn": 4}}));
        let (id, state) = req.into_parts().unwrap();
        assert_eq!(id, "abc123");
        assert_eq!(state, json!({"turn": 4}));
    }

    #[test]
    fn missing_game_id_is_rejected() {
        let req = request(json!({"gameState": {"turn": 4}}));
        assert!(req.validate().is_err());
    }

    #[test]
    fn missing_game_state_is_rejected() {
        let req = request(json!({"gameId": "abc123"}));
        assert!(req.validate().is_err());
    }

    #[test]
    fn null_game_state_is_rejected() {
        // JSON null deserializes into `None`, same as an absent field.
        let req = request(json!({"gameId": "abc123", "gameState": null}));
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_game_id_is_rejected() {
        let req = request(json!({"gameId": "", "gameState": {}}));
        assert!(req.validate().is_err());
    }

    #[test]
    fn scalar_game_state_is_accepted() {
        // The blob is opaque; a bare scalar is as valid as an object.
        let req = request(json!({"gameId": "abc123", "gameState": 42}));
        assert!(req.validate().is_ok());
    }
}
