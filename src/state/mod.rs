//! Shared application state: the installed storage backend and the degraded
//! mode flag.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AccessPolicy, dao::game_store::GameStore, error::ServiceError};

/// Cheaply clonable handle to [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state holding the persistence handle.
///
/// Handlers never construct stores themselves; the single shared handle is
/// installed at composition time (by the storage supervisor in production, by
/// the test harness otherwise) and reused across requests.
pub struct AppState {
    game_store: RwLock<Option<Arc<dyn GameStore>>>,
    degraded: watch::Sender<bool>,
    access: AccessPolicy,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(access: AccessPolicy) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            game_store: RwLock::new(None),
            degraded: degraded_tx,
            access,
        })
    }

    /// Obtain a handle to the current game store, if one is installed.
    pub async fn game_store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.game_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current game store or fail with a degraded-mode error.
    pub async fn require_game_store(&self) -> Result<Arc<dyn GameStore>, ServiceError> {
        self.game_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new game store implementation and leave degraded mode.
    pub async fn set_game_store(&self, store: Arc<dyn GameStore>) {
        {
            let mut guard = self.game_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current game store and enter degraded mode.
    pub async fn clear_game_store(&self) {
        {
            let mut guard = self.game_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.game_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Origin allow-list policy applied before requests reach the handlers.
    pub fn access_policy(&self) -> &AccessPolicy {
        &self.access
    }

    fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::game_store::memory::MemoryGameStore;

    #[tokio::test]
    async fn starts_degraded_until_store_installed() {
        let state = AppState::new(AccessPolicy::open());
        assert!(state.is_degraded().await);
        assert!(state.require_game_store().await.is_err());

        state
            .set_game_store(Arc::new(MemoryGameStore::new()))
            .await;
        assert!(!state.is_degraded().await);
        assert!(state.require_game_store().await.is_ok());
    }

    #[tokio::test]
    async fn clearing_store_reenters_degraded_mode() {
        let state = AppState::new(AccessPolicy::open());
        state
            .set_game_store(Arc::new(MemoryGameStore::new()))
            .await;
        let mut watcher = state.degraded_watcher();
        assert!(!*watcher.borrow_and_update());

        state.clear_game_store().await;
        assert!(state.is_degraded().await);
        assert!(watcher.has_changed().unwrap());
        assert!(*watcher.borrow_and_update());
    }
}
