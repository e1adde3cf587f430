//! Validation helpers for DTOs.

use validator::ValidationError;

/// Document ids are embedded in store paths, so a slash would address a
/// different document than intended.
const FORBIDDEN_CHAR: char = '/';
/// Upper bound on the id length accepted by the document store.
const MAX_ID_BYTES: usize = 1024;

/// Validates that a game id is non-empty (ignoring surrounding whitespace),
/// free of path separators, and short enough for a document id.
pub fn validate_game_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("game_id_empty");
        err.message = Some("gameId must be a non-empty string".into());
        return Err(err);
    }

    if id.contains(FORBIDDEN_CHAR) {
        let mut err = ValidationError::new("game_id_separator");
        err.message = Some("gameId must not contain `/`".into());
        return Err(err);
    }

    if id.len() > MAX_ID_BYTES {
        let mut err = ValidationError::new("game_id_length");
        err.message = Some(
            format!(
                "gameId must be at most {MAX_ID_BYTES} bytes (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_game_id_valid() {
        assert!(validate_game_id("abc123").is_ok());
        assert!(validate_game_id("player-7_save.2").is_ok());
        assert!(validate_game_id("A").is_ok());
    }

    #[test]
    fn test_validate_game_id_empty() {
        assert!(validate_game_id("").is_err());
        assert!(validate_game_id("   ").is_err());
        assert!(validate_game_id("\t\n").is_err());
    }

    #[test]
    fn test_validate_game_id_separator() {
        assert!(validate_game_id("games/abc").is_err());
        assert!(validate_game_id("/abc").is_err());
    }

    #[test]
    fn test_validate_game_id_too_long() {
        let id = "x".repeat(MAX_ID_BYTES + 1);
        assert!(validate_game_id(&id).is_err());
        let id = "x".repeat(MAX_ID_BYTES);
        assert!(validate_game_id(&id).is_ok());
    }
}
