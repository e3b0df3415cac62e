//! FieldsenseErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable error code string
/// that callers (an API layer, a CLI) can match on without parsing messages.
pub trait FieldsenseErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const ALREADY_APPLIED: &str = "ALREADY_APPLIED";
pub const DATA_UNAVAILABLE: &str = "DATA_UNAVAILABLE";
pub const INVALID_RATING: &str = "INVALID_RATING";
pub const STATE_POISONED: &str = "STATE_POISONED";
pub const NOT_FOUND: &str = "NOT_FOUND";
