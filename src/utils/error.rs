use thiserror::Error;

#[derive(Error, Debug)]
pub enum PiggyError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },
}

pub type Result<T> = std::result::Result<T, PiggyError>;
