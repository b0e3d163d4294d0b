use thiserror::Error;

use crate::errors::StorageError;

/// Failures of an auth workflow. Rejections such as a taken username or a bad
/// password are outcomes, not errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Hash(_) => 1101,
            AuthError::Storage(_) => 1200,
        }
    }
}
