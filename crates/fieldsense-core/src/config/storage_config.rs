//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATABASE_PATH, DEFAULT_READ_POOL_SIZE};

/// Configuration for the SQLite belief store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. Default: `agri_recommendations.db`.
    pub database_path: Option<String>,
    /// Read connections in the pool. Default: 4.
    pub read_pool_size: Option<usize>,
}

impl StorageConfig {
    pub fn effective_database_path(&self) -> PathBuf {
        PathBuf::from(
            self.database_path
                .as_deref()
                .unwrap_or(DEFAULT_DATABASE_PATH),
        )
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE)
    }
}
