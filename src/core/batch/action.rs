//! Bulk actions the driver can submit

use crate::core::models::{Activity, Address};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One kind of on-chain bulk call, with its action-specific arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BulkAction {
    Adventure,
    LevelUp,
    ClaimGold,
    Cellar,
    /// Register in the daycare for `days`
    Daycare { days: u32 },
    /// Move summoners from `from` to `to`
    Transfer { from: Address, to: Address },
    /// Send summoners from `from` to the burn address
    Delete { from: Address, burn: Address },
}

impl BulkAction {
    /// Short name used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            BulkAction::Adventure => "adventure",
            BulkAction::LevelUp => "level_up",
            BulkAction::ClaimGold => "claim_gold",
            BulkAction::Cellar => "cellar",
            BulkAction::Daycare { .. } => "daycare",
            BulkAction::Transfer { .. } => "transfer",
            BulkAction::Delete { .. } => "delete",
        }
    }

    /// Whether each chunk must be split by helper approval before submission
    pub fn requires_eligibility(&self) -> bool {
        matches!(self, BulkAction::ClaimGold | BulkAction::Cellar)
    }

    /// Whether the helper operator must hold blanket approval for the account
    pub fn requires_operator_approval(&self) -> bool {
        matches!(self, BulkAction::Adventure | BulkAction::LevelUp)
    }

    /// Ids allowed per call; token transfers move one summoner at a time
    pub fn per_call_limit(&self, chunk_size: usize) -> usize {
        match self {
            BulkAction::Transfer { .. } | BulkAction::Delete { .. } => 1,
            _ => chunk_size,
        }
    }
}

impl From<Activity> for BulkAction {
    fn from(activity: Activity) -> Self {
        match activity {
            Activity::Adventure => BulkAction::Adventure,
            Activity::LevelUp => BulkAction::LevelUp,
            Activity::ClaimGold => BulkAction::ClaimGold,
            Activity::Cellar => BulkAction::Cellar,
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
