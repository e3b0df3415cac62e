//! Configuration system for Fieldsense.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod fieldsense_config;
pub mod forecast_config;
pub mod recommender_config;
pub mod storage_config;

pub use fieldsense_config::{CliOverrides, FieldsenseConfig};
pub use forecast_config::ForecastConfig;
pub use recommender_config::RecommenderConfig;
pub use storage_config::StorageConfig;
