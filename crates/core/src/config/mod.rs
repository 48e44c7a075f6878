//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (READTHRU_*)
//! 2. TOML config file (if READTHRU_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Teams used when generating synthetic seasons.
pub const DEFAULT_TEAMS: [&str; 6] = [
    "Brumlington Wanderers",
    "Excessive Rovers",
    "Losechester City",
    "Spangles United",
    "Gunstown",
    "Cramlington Stanley",
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (READTHRU_*)
/// 2. TOML config file (if READTHRU_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via READTHRU_CACHE_DB_PATH environment variable.
    #[serde(default = "default_cache_db_path")]
    pub cache_db_path: PathBuf,

    /// Path to the SQLite document store database.
    ///
    /// Set via READTHRU_STORE_DB_PATH environment variable.
    #[serde(default = "default_store_db_path")]
    pub store_db_path: PathBuf,

    /// Collection holding the season documents.
    ///
    /// Set via READTHRU_COLLECTION environment variable.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Number of seasons produced by data generation.
    ///
    /// Set via READTHRU_SEASONS environment variable.
    #[serde(default = "default_seasons")]
    pub seasons: u32,

    /// Teams paired up in every generated season.
    ///
    /// Set via READTHRU_TEAMS environment variable (e.g. `["A", "B"]`).
    #[serde(default = "default_teams")]
    pub teams: Vec<String>,
}

fn default_cache_db_path() -> PathBuf {
    PathBuf::from("./readthru-cache.sqlite")
}

fn default_store_db_path() -> PathBuf {
    PathBuf::from("./readthru-store.sqlite")
}

fn default_collection() -> String {
    "results".into()
}

fn default_seasons() -> u32 {
    5
}

fn default_teams() -> Vec<String> {
    DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_db_path: default_cache_db_path(),
            store_db_path: default_store_db_path(),
            collection: default_collection(),
            seasons: default_seasons(),
            teams: default_teams(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `READTHRU_`
    /// 2. TOML file from `READTHRU_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("READTHRU_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("READTHRU_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
