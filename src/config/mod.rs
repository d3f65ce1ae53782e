//! Configuration management
//!
//! Loads and validates the batch, contract, daycare and logging settings.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{PlayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Validated configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub play: PlayConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PlayError::Config(format!("Failed to read config file: {}", e)))?;

        let play: PlayConfig = serde_yaml::from_str(&content)
            .map_err(|e| PlayError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { play };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from `PLAY_*` variables, reading `.env` first
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }

        let play = PlayConfig::from_env()?;
        let config = Self { play };

        config.validate()?;
        Ok(config)
    }

    pub fn batch(&self) -> &BatchConfig {
        &self.play.batch
    }

    pub fn contracts(&self) -> &ContractsConfig {
        &self.play.contracts
    }

    pub fn daycare(&self) -> &DaycareConfig {
        &self.play.daycare
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.play.logging
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.play
            .validate()
            .map_err(|e| PlayError::Config(format!("Invalid configuration: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.play)
            .map_err(|e| PlayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
