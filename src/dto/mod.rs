/// Game save/load request and response payloads.
pub mod game;
/// Health check payloads.
pub mod health;
/// Validation helpers for DTOs.
pub mod validation;
