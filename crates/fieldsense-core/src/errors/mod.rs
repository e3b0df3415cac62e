//! Error handling for Fieldsense.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod advisor_error;
pub mod config_error;
pub mod data_error;
pub mod error_code;
pub mod recommender_error;
pub mod storage_error;

pub use advisor_error::AdvisorError;
pub use config_error::{ConfigError, ConfigLayer};
pub use data_error::DataUnavailable;
pub use error_code::FieldsenseErrorCode;
pub use recommender_error::RecommenderError;
pub use storage_error::StorageError;
