use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonolithError>;

#[derive(Debug, Error)]
pub enum MonolithError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("Invalid {kind} identifier: {value}")]
    InvalidId { kind: &'static str, value: String },

    #[error("Invalid {field} value: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("{collection} record not found: {id}")]
    RecordNotFound { collection: String, id: String },

    #[error("Store not initialized")]
    StoreNotInitialized,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timer error: {0}")]
    TimerError(String),
}
