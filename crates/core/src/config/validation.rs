//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::collections::HashSet;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `collection` is empty
    /// - `seasons` is 0 or exceeds 1000
    /// - `teams` has fewer than two entries, a blank name, or a duplicate
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "collection".into(), reason: "must not be empty".into() });
        }

        if self.seasons == 0 {
            return Err(ConfigError::Invalid { field: "seasons".into(), reason: "must be greater than 0".into() });
        }
        if self.seasons > 1000 {
            return Err(ConfigError::Invalid { field: "seasons".into(), reason: "must not exceed 1000".into() });
        }

        if self.teams.len() < 2 {
            return Err(ConfigError::Invalid { field: "teams".into(), reason: "need at least two teams".into() });
        }
        if self.teams.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid { field: "teams".into(), reason: "team names must not be blank".into() });
        }
        let unique: HashSet<&str> = self.teams.iter().map(String::as_str).collect();
        if unique.len() != self.teams.len() {
            return Err(ConfigError::Invalid { field: "teams".into(), reason: "team names must be unique".into() });
        }

        if self.cache_db_path == self.store_db_path {
            tracing::warn!(
                path = %self.cache_db_path.display(),
                "cache and document store share one database file; \
                 a store outage will also take the cache down"
            );
        }

        Ok(())
    }
}
