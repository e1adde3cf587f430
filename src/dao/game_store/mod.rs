/// In-memory backend, used as the substitute store in tests.
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::models::GameRecordEntity;
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for game state records.
///
/// Implementations address a document store by collection name + document id
/// and guarantee nothing beyond "last successful save is visible to the next
/// load"; concurrent saves to the same id are last-write-wins.
pub trait GameStore: Send + Sync {
    /// Upsert the state blob stored under `id`, replacing any prior value.
    fn save_state(
        &self,
        id: String,
        state: serde_json::Value,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Point-read the record stored under `id`.
    fn find_state(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameRecordEntity>>>;
    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection in place.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
