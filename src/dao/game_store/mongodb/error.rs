use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Result alias for MongoDB DAO operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB backend.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to save game state `{id}`")]
    SaveState {
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load game state `{id}`")]
    LoadState {
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("missing required environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
}
