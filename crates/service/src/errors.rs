use thiserror::Error;

/// Failure inside a credential store backend. Fatal for the request that hit it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl From<models::errors::ModelError> for StorageError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::InvalidRecord(msg),
            models::errors::ModelError::Db(msg) => Self::Db(msg),
        }
    }
}
