use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{game_store::GameStore, models::GameRecordEntity, storage::StorageResult};

/// Process-local [`GameStore`] keeping records in a `HashMap`.
///
/// Used as the dependency-injected substitute store in tests; it is always
/// healthy and reconnection is a no-op.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    records: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl MemoryGameStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl GameStore for MemoryGameStore {
    fn save_state(
        &self,
        id: String,
        state: serde_json::Value,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.records.write().await.insert(id, state);
            Ok(())
        })
    }

    fn find_state(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let guard = store.records.read().await;
            Ok(guard
                .get(&id)
                .map(|state| GameRecordEntity::new(id, state.clone())))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let store = MemoryGameStore::new();
        let state = json!({"turn": 4, "board": [1, 0, 2]});

        store
            .save_state("abc123".into(), state.clone())
            .await
            .unwrap();

        let record = store.find_state("abc123".into()).await.unwrap().unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.state, state);
    }

    #[tokio::test]
    async fn second_save_replaces_first() {
        let store = MemoryGameStore::new();
        store
            .save_state("slot".into(), json!({"turn": 1}))
            .await
            .unwrap();
        store
            .save_state("slot".into(), json!({"turn": 2}))
            .await
            .unwrap();

        let record = store.find_state("slot".into()).await.unwrap().unwrap();
        assert_eq!(record.state, json!({"turn": 2}));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_unknown_id_is_none() {
        let store = MemoryGameStore::new();
        assert!(store.find_state("nope".into()).await.unwrap().is_none());
    }
}
