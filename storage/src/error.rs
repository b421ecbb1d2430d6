//! Storage error types.
//!
//! Used inside the repository; converted to [`StayError`] at the store trait boundary.

use stay_core::StayError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::AlreadyExists(db.message().to_string())
            }
            sqlx::Error::RowNotFound => StorageError::NotFound(e.to_string()),
            _ => StorageError::Database(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<StorageError> for StayError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AlreadyExists(msg) => StayError::DuplicateFeedback(msg),
            other => StayError::Persistence(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_maps_to_duplicate() {
        let e: StayError = StorageError::AlreadyExists("feedback_events".into()).into();
        assert!(matches!(e, StayError::DuplicateFeedback(_)));
    }

    #[test]
    fn test_database_maps_to_persistence() {
        let e: StayError = StorageError::Database("locked".into()).into();
        assert!(matches!(e, StayError::Persistence(msg) if msg.contains("locked")));
    }
}
