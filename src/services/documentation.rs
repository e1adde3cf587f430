use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Game Vault Back.
#[openapi(
    paths(
        crate::routes::game::save_game,
        crate::routes::game::load_game,
        crate::routes::health::healthcheck,
    ),
    components(
        schemas(
            crate::dto::game::SaveGameRequest,
            crate::dto::game::SaveGameResponse,
            crate::dto::game::GameRecordResponse,
            crate::dto::health::HealthResponse,
        )
    ),
    tags(
        (name = "game", description = "Game state persistence"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
