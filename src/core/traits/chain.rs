//! Chain-facing collaborator traits
//!
//! Every mutating call resolves only once the transaction is confirmed.

use crate::core::models::{Address, Summoner, SummonerId, TxReceipt, WalletContext};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Connected wallet
#[cfg_attr(test, mockall::automock)]
pub trait WalletProvider: Send + Sync {
    /// Current account, chain and visibility
    fn context(&self) -> WalletContext;
}

/// Indexer plus library contract lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummonerSource: Send + Sync {
    /// Ids of the summoners owned by `owner`
    async fn owned_summoners(&self, owner: Address) -> Result<Vec<SummonerId>>;

    /// Full snapshots for `ids`, same order; any single failure fails the call
    async fn summoners_full(&self, ids: &[SummonerId]) -> Result<Vec<Summoner>>;
}

/// Bulk helper contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelperContract: Send + Sync {
    /// Per-summoner approval of the helper, positionally aligned with `ids`
    async fn is_approved(&self, ids: &[SummonerId]) -> Result<Vec<bool>>;

    async fn adventure(&self, ids: &[SummonerId]) -> Result<TxReceipt>;

    async fn level_up(&self, ids: &[SummonerId]) -> Result<TxReceipt>;

    /// `approve` lists the summoners the helper must approve before claiming
    async fn claim_gold(&self, ids: &[SummonerId], approve: &[SummonerId]) -> Result<TxReceipt>;

    /// `approve` lists the summoners the helper must approve before the cellar run
    async fn cellar(&self, ids: &[SummonerId], approve: &[SummonerId]) -> Result<TxReceipt>;
}

/// Core summoner (ERC-721) contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummonerContract: Send + Sync {
    async fn is_approved_for_all(&self, owner: Address, operator: Address) -> Result<bool>;

    async fn set_approval_for_all(&self, operator: Address) -> Result<TxReceipt>;

    async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        id: &SummonerId,
    ) -> Result<TxReceipt>;
}

/// Daily care service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DaycareContract: Send + Sync {
    async fn days_paid(&self, id: &SummonerId) -> Result<u32>;

    async fn register_daycare(&self, ids: &[SummonerId], days: u32) -> Result<TxReceipt>;
}
