//! Advisor (use-case level) errors.

use super::error_code::{self, FieldsenseErrorCode};
use super::{ConfigError, DataUnavailable, RecommenderError, StorageError};

/// Errors surfaced by the field-level use cases.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("Field {field_id} not found")]
    FieldNotFound { field_id: i64 },

    #[error("Recommendation {recommendation_id} not found")]
    RecommendationNotFound { recommendation_id: i64 },

    #[error("{0}")]
    Data(#[from] DataUnavailable),

    #[error("Recommender error: {0}")]
    Recommender(#[from] RecommenderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FieldsenseErrorCode for AdvisorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FieldNotFound { .. } | Self::RecommendationNotFound { .. } => {
                error_code::NOT_FOUND
            }
            Self::Data(e) => e.error_code(),
            Self::Recommender(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
