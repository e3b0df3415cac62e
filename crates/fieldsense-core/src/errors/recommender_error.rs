//! Recommender errors.

use super::error_code::{self, FieldsenseErrorCode};
use super::StorageError;

/// Errors raised by the bandit recommender.
#[derive(Debug, thiserror::Error)]
pub enum RecommenderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Rating {rating} is outside 1..=10")]
    InvalidRating { rating: i64 },

    #[error("Belief cache lock poisoned")]
    StatePoisoned,
}

impl FieldsenseErrorCode for RecommenderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::InvalidRating { .. } => error_code::INVALID_RATING,
            Self::StatePoisoned => error_code::STATE_POISONED,
        }
    }
}
