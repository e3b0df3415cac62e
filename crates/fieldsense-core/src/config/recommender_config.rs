//! Recommender configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EXPLORATION_RATE;

/// Configuration for the bandit recommender.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Probability of exploring instead of exploiting. Default: 0.1.
    pub exploration_rate: Option<f64>,
    /// Fixed RNG seed for reproducible runs. Default: entropy.
    pub seed: Option<u64>,
}

impl RecommenderConfig {
    /// Returns the effective exploration rate, defaulting to 0.1.
    pub fn effective_exploration_rate(&self) -> f64 {
        self.exploration_rate.unwrap_or(DEFAULT_EXPLORATION_RATE)
    }
}
