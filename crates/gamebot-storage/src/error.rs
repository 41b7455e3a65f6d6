//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid database location: {0}")]
    InvalidLocation(String),
}

impl From<StorageError> for gamebot_core::Error {
    fn from(e: StorageError) -> Self {
        gamebot_core::Error::Persistence(e.to_string())
    }
}
