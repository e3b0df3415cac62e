//! Storage errors for SQLite operations.

use super::error_code::{self, FieldsenseErrorCode};

/// Storage-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("feedback {feedback_id} has already been applied to the belief state")]
    FeedbackAlreadyApplied { feedback_id: i64 },
}

impl StorageError {
    /// Shorthand used by every query module.
    pub fn sqlite(e: impl std::fmt::Display) -> Self {
        Self::SqliteError {
            message: e.to_string(),
        }
    }
}

impl FieldsenseErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } | Self::Serialization { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::FeedbackAlreadyApplied { .. } => error_code::ALREADY_APPLIED,
        }
    }
}
