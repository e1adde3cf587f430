use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::{Collection, Database, bson::doc};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoGameStateDocument, doc_id},
};
use crate::dao::{game_store::GameStore, models::GameRecordEntity, storage::StorageResult};

const GAME_COLLECTION_NAME: &str = "games";

/// MongoDB-backed game state store.
///
/// The connection lives behind an `RwLock` so the storage supervisor can swap
/// it in place after a reconnect without invalidating handles held elsewhere.
#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

// A `Database` handle keeps the underlying client topology alive, so only the
// database needs to survive a reconnect swap.
struct MongoState {
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (_, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_, database) = establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { database }),
            config,
        });

        Ok(Self { inner })
    }

    async fn collection(&self) -> Collection<MongoGameStateDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoGameStateDocument>(GAME_COLLECTION_NAME)
    }

    async fn save_state(&self, id: String, state: serde_json::Value) -> MongoResult<()> {
        let document: MongoGameStateDocument = GameRecordEntity::new(id.clone(), state).into();
        let collection = self.collection().await;
        collection
            .replace_one(doc_id(&id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveState { id, source })?;

        Ok(())
    }

    async fn find_state(&self, id: String) -> MongoResult<Option<GameRecordEntity>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(doc_id(&id))
            .await
            .map_err(|source| MongoDaoError::LoadState { id, source })?;

        Ok(document.map(Into::into))
    }
}

impl GameStore for MongoGameStore {
    fn save_state(
        &self,
        id: String,
        state: serde_json::Value,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_state(id, state).await.map_err(Into::into) })
    }

    fn find_state(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_state(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
