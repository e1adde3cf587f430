use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{game_store::GameStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Keep a storage backend installed in the shared state, entering degraded
/// mode whenever it is unreachable.
///
/// `connect` is invoked to build a fresh store; once one is installed its
/// health is polled, and on failure a bounded number of in-place reconnects
/// is attempted before the store is dropped and connection starts over.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn GameStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        let store = match connect().await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
                continue;
            }
        };

        state.set_game_store(store.clone()).await;
        info!("storage connection established; leaving degraded mode");
        delay = INITIAL_DELAY;

        supervise(&state, store).await;

        // The installed store is gone for good; back to connecting.
        state.clear_game_store().await;
        sleep(delay).await;
    }
}

/// Poll the installed store until reconnection attempts are exhausted.
async fn supervise(state: &SharedState, store: Arc<dyn GameStore>) {
    loop {
        match store.health_check().await {
            Ok(()) => {
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                warn!(error = %err, "storage health check failed; entering degraded mode");
                state.clear_game_store().await;

                if !reconnect_with_backoff(&store).await {
                    warn!("exhausted storage reconnect attempts; reconnecting from scratch");
                    return;
                }

                state.set_game_store(store.clone()).await;
                info!("storage reconnection succeeded; leaving degraded mode");
            }
        }
    }
}

/// Try a bounded number of in-place reconnects, true on success.
async fn reconnect_with_backoff(store: &Arc<dyn GameStore>) -> bool {
    let mut delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => return true,
            Err(err) => {
                warn!(attempt, error = %err, "storage reconnect attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }

    false
}
