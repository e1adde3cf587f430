/// OpenAPI documentation generation.
pub mod documentation;
/// Save/load operations over the persisted game state records.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Storage reconnection loop toggling degraded mode.
pub mod storage_supervisor;
