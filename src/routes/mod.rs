use axum::{Router, middleware};

use crate::state::SharedState;

/// Origin allow-list middleware.
pub mod access;
/// Swagger UI routes.
pub mod docs;
/// Game state save/load routes.
pub mod game;
/// Health check routes.
pub mod health;

/// Compose all route trees, wiring in shared state and the origin guard.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = game::router().merge(health::router());

    let docs_router = docs::router(state.clone());

    api_router
        .merge(docs_router)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access::enforce_origin,
        ))
        .with_state(state)
}
