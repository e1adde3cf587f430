use axum::{
    Json, Router,
    extract::{Query, State},
    routing::post,
};

use crate::{
    dto::game::{GameRecordResponse, LoadGameQuery, SaveGameRequest, SaveGameResponse},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes handling game state persistence.
///
/// Save and load share one path so any other verb on it answers 405 without
/// touching the persistence layer.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/game", post(save_game).get(load_game))
}

/// Persist the submitted game state blob under its game id.
#[utoipa::path(
    post,
    path = "/api/game",
    tag = "game",
    request_body = SaveGameRequest,
    responses(
        (status = 200, description = "Game state saved", body = SaveGameResponse),
        (status = 400, description = "Missing gameId or gameState"),
        (status = 500, description = "Persistence failure"),
    )
)]
pub async fn save_game(
    State(state): State<SharedState>,
    Json(payload): Json<SaveGameRequest>,
) -> Result<Json<SaveGameResponse>, AppError> {
    game_service::save_state(&state, payload).await?;
    Ok(Json(SaveGameResponse::saved()))
}

/// Return the stored record for a game id.
#[utoipa::path(
    get,
    path = "/api/game",
    tag = "game",
    params(("gameId" = Option<String>, Query, description = "Identifier of the game to load")),
    responses(
        (status = 200, description = "Stored game record", body = GameRecordResponse),
        (status = 400, description = "Missing gameId"),
        (status = 404, description = "No record for this gameId"),
        (status = 500, description = "Persistence failure"),
    )
)]
pub async fn load_game(
    State(state): State<SharedState>,
    Query(query): Query<LoadGameQuery>,
) -> Result<Json<GameRecordResponse>, AppError> {
    let record = game_service::load_state(&state, query.game_id).await?;
    Ok(Json(record.into()))
}
