//! Contract addresses

use super::*;
use crate::core::models::Address;
use serde::{Deserialize, Serialize};

/// Addresses the dashboard needs besides the wallet's own contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Bulk helper operator; has no usable default
    #[serde(default)]
    pub helper: Address,
    /// Where deleted summoners are sent
    #[serde(default = "default_burn_address")]
    pub burn: Address,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            helper: Address::ZERO,
            burn: default_burn_address(),
        }
    }
}
