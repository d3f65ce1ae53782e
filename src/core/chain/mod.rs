//! Contract client bundle
//!
//! Groups the contract collaborators and maps a [`BulkAction`] onto the call
//! that carries it.

pub mod memory;

pub use memory::{CHAIN_ID, ChainCall, MemoryChain};

use crate::core::batch::BulkAction;
use crate::core::models::{Address, SummonerId, TxReceipt};
use crate::core::traits::{DaycareContract, HelperContract, SummonerContract};
use crate::utils::error::{PlayError, Result};
use std::sync::Arc;

/// The contracts the dashboard talks to
#[derive(Clone)]
pub struct ChainClients {
    pub helper: Arc<dyn HelperContract>,
    pub summoner: Arc<dyn SummonerContract>,
    pub daycare: Arc<dyn DaycareContract>,
}

impl ChainClients {
    pub fn new(
        helper: Arc<dyn HelperContract>,
        summoner: Arc<dyn SummonerContract>,
        daycare: Arc<dyn DaycareContract>,
    ) -> Self {
        Self {
            helper,
            summoner,
            daycare,
        }
    }

    /// Bundle where one value implements every contract
    pub fn from_single<C>(contracts: Arc<C>) -> Self
    where
        C: HelperContract + SummonerContract + DaycareContract + 'static,
    {
        Self {
            helper: contracts.clone(),
            summoner: contracts.clone(),
            daycare: contracts,
        }
    }

    /// Submit one chunk of `action` and wait for its confirmation
    pub async fn submit(
        &self,
        action: &BulkAction,
        ids: &[SummonerId],
        needs_action: &[SummonerId],
    ) -> Result<TxReceipt> {
        match action {
            BulkAction::Adventure => self.helper.adventure(ids).await,
            BulkAction::LevelUp => self.helper.level_up(ids).await,
            BulkAction::ClaimGold => self.helper.claim_gold(ids, needs_action).await,
            BulkAction::Cellar => self.helper.cellar(ids, needs_action).await,
            BulkAction::Daycare { days } => self.daycare.register_daycare(ids, *days).await,
            BulkAction::Transfer { from, to } => self.transfer_each(*from, *to, ids).await,
            BulkAction::Delete { from, burn } => self.transfer_each(*from, *burn, ids).await,
        }
    }

    async fn transfer_each(
        &self,
        from: Address,
        to: Address,
        ids: &[SummonerId],
    ) -> Result<TxReceipt> {
        let mut last = None;
        for id in ids {
            last = Some(self.summoner.transfer_from(from, to, id).await?);
        }
        last.ok_or_else(|| PlayError::validation("No summoner to transfer"))
    }
}

impl std::fmt::Debug for ChainClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClients").finish_non_exhaustive()
    }
}
