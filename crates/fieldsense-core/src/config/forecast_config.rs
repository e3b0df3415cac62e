//! Forecast configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DAYS_AHEAD;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ForecastConfig {
    /// Forecast horizon when a caller does not specify one. Default: 7.
    pub days_ahead: Option<u32>,
}

impl ForecastConfig {
    pub fn effective_days_ahead(&self) -> u32 {
        self.days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD)
    }
}
