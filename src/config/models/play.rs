//! Top-level configuration document

use super::*;
use crate::utils::error::{PlayError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// All configuration sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayConfig {
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub daycare: DaycareConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlayConfig {
    /// Build from `PLAY_*` environment variables, defaulting what is unset
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup using the `PLAY_*` variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(size) = parse_var(&lookup, "PLAY_CHUNK_SIZE")? {
            config.batch.chunk_size = size;
        }
        if let Some(helper) = parse_var(&lookup, "PLAY_HELPER_ADDRESS")? {
            config.contracts.helper = helper;
        }
        if let Some(burn) = parse_var(&lookup, "PLAY_BURN_ADDRESS")? {
            config.contracts.burn = burn;
        }
        if let Some(fee) = parse_var(&lookup, "PLAY_DAYCARE_FEE_PER_DAY_WEI")? {
            config.daycare.fee_per_day_wei = fee;
        }
        if let Some(days) = parse_var(&lookup, "PLAY_DAYCARE_MAX_DAYS")? {
            config.daycare.max_days = days;
        }
        if let Some(level) = lookup("PLAY_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = parse_var(&lookup, "PLAY_LOG_JSON")? {
            config.logging.json = json;
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| PlayError::Config(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}
