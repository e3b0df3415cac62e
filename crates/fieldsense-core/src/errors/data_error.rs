//! Upstream data errors.
//!
//! Raised by the weather/risk collaborators and passed through the core
//! unchanged. The core never retries.

use super::error_code::{self, FieldsenseErrorCode};

/// Weather or soil data could not be obtained or was unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataUnavailable {
    #[error("Failed to fetch weather data: {message}")]
    FetchFailed { message: String },

    #[error("Incomplete weather data: missing {missing}")]
    Incomplete { missing: String },

    #[error("Malformed weather data: {message}")]
    Malformed { message: String },
}

impl FieldsenseErrorCode for DataUnavailable {
    fn error_code(&self) -> &'static str {
        error_code::DATA_UNAVAILABLE
    }
}
