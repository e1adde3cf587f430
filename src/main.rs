//! Game Vault Back binary entrypoint wiring the REST surface and the MongoDB layer.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use axum::http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_vault_back::{config::AppConfig, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let app_state = AppState::new(config.access_policy());

    spawn_storage_supervisor(app_state.clone(), &config);

    let app = build_router(app_state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

#[cfg(feature = "mongo-store")]
fn spawn_storage_supervisor(state: game_vault_back::state::SharedState, config: &AppConfig) {
    use std::sync::Arc;

    use game_vault_back::dao::game_store::{
        GameStore,
        mongodb::{MongoConfig, MongoGameStore},
    };
    use game_vault_back::services::storage_supervisor;

    let uri = config.mongo_uri.clone();
    let db = config.mongo_db.clone();

    tokio::spawn(storage_supervisor::run(state, move || {
        let uri = uri.clone();
        let db = db.clone();
        async move {
            let mongo_config = MongoConfig::from_uri(&uri, db.as_deref()).await?;
            let store = MongoGameStore::connect(mongo_config).await?;
            Ok(Arc::new(store) as Arc<dyn GameStore>)
        }
    }));
}

#[cfg(not(feature = "mongo-store"))]
fn spawn_storage_supervisor(_state: game_vault_back::state::SharedState, _config: &AppConfig) {
    warn!("no storage backend compiled in; running degraded");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: game_vault_back::state::SharedState, config: &AppConfig) -> Router<()> {
    routes::router(state)
        .layer(build_cors(config))
        .layer(TraceLayer::new_for_http())
}

/// Reflect the configured allow-list in the CORS layer; with no list the
/// permissive layer answers any origin.
fn build_cors(config: &AppConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring unparseable allow-list entry for CORS");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
