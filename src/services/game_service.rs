use tracing::debug;

use crate::{
    dao::models::GameRecordEntity,
    dto::{game::SaveGameRequest, validation::validate_game_id},
    error::ServiceError,
    state::SharedState,
};

/// Persist a game state blob under its id, replacing any prior value.
///
/// Performs exactly one upsert against the installed store; validation
/// failures return before any persistence access happens.
pub async fn save_state(state: &SharedState, request: SaveGameRequest) -> Result<(), ServiceError> {
    let (game_id, game_state) = request
        .into_parts()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let store = state.require_game_store().await?;
    store.save_state(game_id.clone(), game_state).await?;
    debug!(%game_id, "game state saved");
    Ok(())
}

/// Load the record stored under `game_id` with a single point read.
pub async fn load_state(
    state: &SharedState,
    game_id: Option<String>,
) -> Result<GameRecordEntity, ServiceError> {
    let game_id = game_id.ok_or_else(|| ServiceError::InvalidInput("gameId is required".into()))?;
    validate_game_id(&game_id)
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let store = state.require_game_store().await?;
    let Some(record) = store.find_state(game_id).await? else {
        return Err(ServiceError::NotFound("Game not found".into()));
    };

    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use futures::future::BoxFuture;
    use serde_json::json;

    use super::*;
    use crate::{
        config::AccessPolicy,
        dao::{
            game_store::{GameStore, memory::MemoryGameStore},
            storage::StorageResult,
        },
        state::AppState,
    };

    /// Wraps a store and counts how many persistence calls go through,
    /// so tests can prove a rejected request never touched the backend.
    #[derive(Clone)]
    struct CountingStore {
        inner: MemoryGameStore,
        calls: Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryGameStore::new(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GameStore for CountingStore {
        fn save_state(
            &self,
            id: String,
            state: serde_json::Value,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.save_state(id, state)
        }

        fn find_state(
            &self,
            id: String,
        ) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_state(id)
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.health_check()
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.try_reconnect()
        }
    }

    fn request(body: serde_json::Value) -> SaveGameRequest {
        serde_json::from_value(body).expect("deserialize request")
    }

    async fn state_with(store: CountingStore) -> SharedState {
        let state = AppState::new(AccessPolicy::open());
        state.set_game_store(Arc::new(store)).await;
        state
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = CountingStore::new();
        let state = state_with(store.clone()).await;

        let payload = json!({"turn": 4, "board": [1, 0, 2]});
        save_state(
            &state,
            request(json!({"gameId": "abc123", "gameState": payload})),
        )
        .await
        .unwrap();

        let record = load_state(&state, Some("abc123".into())).await.unwrap();
        assert_eq!(record.state, payload);
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn second_save_wins() {
        let state = state_with(CountingStore::new()).await;

        save_state(
            &state,
            request(json!({"gameId": "slot", "gameState": {"turn": 1}})),
        )
        .await
        .unwrap();
        save_state(
            &state,
            request(json!({"gameId": "slot", "gameState": {"turn": 2}})),
        )
        .await
        .unwrap();

        let record = load_state(&state, Some("slot".into())).await.unwrap();
        assert_eq!(record.state, json!({"turn": 2}));
    }

    #[tokio::test]
    async fn load_of_unknown_id_is_not_found() {
        let state = state_with(CountingStore::new()).await;
        let err = load_state(&state, Some("doesNotExist".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_save_never_reaches_the_store() {
        let store = CountingStore::new();
        let state = state_with(store.clone()).await;

        let err = save_state(&state, request(json!({"gameState": {"turn": 1}})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = save_state(&state, request(json!({"gameId": "abc123"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        assert_eq!(store.calls(), 0);
        assert!(store.inner.is_empty().await);
    }

    #[tokio::test]
    async fn missing_game_id_on_load_is_invalid_input() {
        let store = CountingStore::new();
        let state = state_with(store.clone()).await;

        let err = load_state(&state, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn degraded_state_fails_without_store_access() {
        let state = AppState::new(AccessPolicy::open());
        let err = save_state(
            &state,
            request(json!({"gameId": "abc123", "gameState": {}})),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));

        let err = load_state(&state, Some("abc123".into())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
