//! Daycare configuration

use super::*;
use crate::core::models::summoner::wei;
use serde::{Deserialize, Serialize};

/// Daycare pricing and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaycareConfig {
    /// Fee per summoner per day, wei-scaled
    #[serde(default, with = "wei")]
    pub fee_per_day_wei: u128,
    /// Longest registration accepted in one call
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for DaycareConfig {
    fn default() -> Self {
        Self {
            fee_per_day_wei: 0,
            max_days: default_max_days(),
        }
    }
}

impl DaycareConfig {
    /// Total fee for registering `summoners` for `days`
    pub fn quote(&self, summoners: usize, days: u32) -> u128 {
        self.fee_per_day_wei
            .saturating_mul(summoners as u128)
            .saturating_mul(days as u128)
    }
}
