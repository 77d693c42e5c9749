//! Shared store types for Heritage
//!
//! Error type used by the project lookup implementations.

use crate::error::Error;
use thiserror::Error;

/// Store-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Store connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Internal(msg),
            RepositoryError::Poisoned => Error::Internal("Project store unavailable".to_string()),
        }
    }
}
