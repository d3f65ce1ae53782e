//! Core data models
//!
//! Summoner snapshots, the roster collection and account addresses.

pub mod address;
pub mod roster;
pub mod summoner;

// Re-export commonly used types
pub use address::Address;
pub use roster::Roster;
pub use summoner::*;

use serde::{Deserialize, Serialize};

/// What the connected wallet currently reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletContext {
    /// Connected account, if any
    pub account: Option<Address>,
    /// Chain id of the active network
    pub chain_id: Option<u64>,
    /// Whether the dashboard window is visible
    pub visible: bool,
}

impl WalletContext {
    pub fn new(account: Address, chain_id: u64) -> Self {
        Self {
            account: Some(account),
            chain_id: Some(chain_id),
            visible: true,
        }
    }

    /// Account to fetch for, when the context allows fetching at all
    pub fn ready_account(&self) -> Option<Address> {
        match (self.account, self.chain_id, self.visible) {
            (Some(account), Some(_), true) => Some(account),
            _ => None,
        }
    }
}

/// Receipt of a confirmed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash
    pub hash: String,
    /// Block the transaction was confirmed in
    pub block_number: u64,
}
