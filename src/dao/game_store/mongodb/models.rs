use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::dao::models::GameRecordEntity;

/// Document stored in the `games` collection: the game id as `_id` plus the
/// opaque state blob. The blob is kept as [`serde_json::Value`] so the driver
/// serializes whatever the client sent without an intermediate schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameStateDocument {
    #[serde(rename = "_id")]
    id: String,
    state: serde_json::Value,
}

impl From<GameRecordEntity> for MongoGameStateDocument {
    fn from(value: GameRecordEntity) -> Self {
        Self {
            id: value.id,
            state: value.state,
        }
    }
}

impl From<MongoGameStateDocument> for GameRecordEntity {
    fn from(value: MongoGameStateDocument) -> Self {
        Self {
            id: value.id,
            state: value.state,
        }
    }
}

pub fn doc_id(id: &str) -> Document {
    doc! {"_id": id}
}
