//! In-memory chain
//!
//! A deterministic stand-in for the Rarity contracts and the summoner
//! indexer. It records every call so callers can check ordering, and it can
//! be told to reject a given submission or fail the approval oracle.

use crate::core::models::{
    Address, Summoner, SummonerId, TxReceipt, WEI_PER_UNIT, WalletContext, xp_required,
};
use crate::core::traits::{
    DaycareContract, HelperContract, SummonerContract, SummonerSource, WalletProvider,
};
use crate::utils::error::{PlayError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

/// Seconds between two adventures or cellar runs
pub const DAY: u64 = 86_400;

/// Experience granted by one adventure
pub const ADVENTURE_XP: u128 = 250 * WEI_PER_UNIT;

/// Chain id reported by the in-memory wallet (Fantom opera)
pub const CHAIN_ID: u64 = 250;

/// One observed interaction with the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    /// Approval oracle query
    IsApproved { ids: Vec<SummonerId> },
    /// A transaction was sent
    Submitted {
        method: &'static str,
        ids: Vec<SummonerId>,
        approve: Vec<SummonerId>,
    },
    /// A transaction was confirmed
    Confirmed { method: &'static str, block: u64 },
    /// A transaction was rejected
    Rejected { method: &'static str, reason: String },
}

#[derive(Debug, Default)]
struct LedgerState {
    now: u64,
    block: u64,
    summoners: Vec<Summoner>,
    owners: HashMap<SummonerId, Address>,
    operators: HashSet<(Address, Address)>,
    helper_approved: HashSet<SummonerId>,
    calls: Vec<ChainCall>,
    submissions: usize,
    reject_submission: Option<usize>,
    oracle_down: bool,
    source_down: bool,
    disconnected: bool,
}

impl LedgerState {
    fn index_of(&self, id: &SummonerId) -> Result<usize> {
        self.summoners
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| PlayError::chain(format!("unknown summoner {}", id)))
    }

    fn require_owner(&self, id: &SummonerId, owner: Address) -> Result<usize> {
        let index = self.index_of(id)?;
        match self.owners.get(id) {
            Some(current) if *current == owner => Ok(index),
            _ => Err(PlayError::chain(format!("{} does not own summoner {}", owner, id))),
        }
    }

    fn require_helper(&self, id: &SummonerId, signer: Address, helper: Address) -> Result<()> {
        let owner = self
            .owners
            .get(id)
            .copied()
            .ok_or_else(|| PlayError::chain(format!("unknown summoner {}", id)))?;
        if owner != signer {
            return Err(PlayError::chain(format!("{} does not own summoner {}", signer, id)));
        }
        if self.operators.contains(&(owner, helper)) || self.helper_approved.contains(id) {
            Ok(())
        } else {
            Err(PlayError::chain(format!("helper not approved for summoner {}", id)))
        }
    }

    /// Checks for a helper call that approves `approve` before acting on `ids`
    fn require_helper_with(
        &self,
        ids: &[SummonerId],
        approve: &[SummonerId],
        signer: Address,
        helper: Address,
    ) -> Result<()> {
        for id in approve {
            self.require_owner(id, signer)?;
        }
        for id in ids {
            if approve.contains(id) {
                self.require_owner(id, signer)?;
            } else {
                self.require_helper(id, signer, helper)?;
            }
        }
        Ok(())
    }
}

/// Deterministic in-memory ledger
#[derive(Debug)]
pub struct MemoryChain {
    signer: Address,
    helper: Address,
    confirmation_delay: Duration,
    state: Mutex<LedgerState>,
}

impl MemoryChain {
    /// Ledger where `signer` sends every transaction and `helper` is the bulk operator
    pub fn new(signer: Address, helper: Address) -> Self {
        Self {
            signer,
            helper,
            confirmation_delay: Duration::ZERO,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Wait this long between sending and confirming each transaction
    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = delay;
        self
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Set the ledger clock (unix seconds)
    pub fn set_now(&self, now: u64) {
        self.state.lock().now = now;
    }

    pub fn now(&self) -> u64 {
        self.state.lock().now
    }

    /// Mint summoners owned by `owner`
    pub fn mint(&self, owner: Address, summoners: impl IntoIterator<Item = Summoner>) {
        let mut state = self.state.lock();
        for summoner in summoners {
            state.owners.insert(summoner.id.clone(), owner);
            state.summoners.retain(|s| s.id != summoner.id);
            state.summoners.push(summoner);
        }
    }

    /// Mark summoners as individually approved for the helper
    pub fn approve_for_helper(&self, ids: &[SummonerId]) {
        let mut state = self.state.lock();
        state.helper_approved.extend(ids.iter().cloned());
    }

    /// Reject the `n`th transaction (1-based) sent from now on
    pub fn reject_submission(&self, n: usize) {
        let mut state = self.state.lock();
        state.reject_submission = Some(state.submissions + n);
    }

    /// Make the approval oracle fail
    pub fn set_oracle_down(&self, down: bool) {
        self.state.lock().oracle_down = down;
    }

    /// Make the summoner source fail
    pub fn set_source_down(&self, down: bool) {
        self.state.lock().source_down = down;
    }

    /// Connect or disconnect the in-memory wallet
    pub fn set_connected(&self, connected: bool) {
        self.state.lock().disconnected = !connected;
    }

    /// Every call observed so far
    pub fn calls(&self) -> Vec<ChainCall> {
        self.state.lock().calls.clone()
    }

    /// Only the submitted transactions, in order
    pub fn submissions(&self) -> Vec<(&'static str, Vec<SummonerId>, Vec<SummonerId>)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ChainCall::Submitted {
                    method,
                    ids,
                    approve,
                } => Some((*method, ids.clone(), approve.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn summoner(&self, id: &SummonerId) -> Option<Summoner> {
        let state = self.state.lock();
        state.summoners.iter().find(|s| &s.id == id).cloned()
    }

    pub fn owner_of(&self, id: &SummonerId) -> Option<Address> {
        self.state.lock().owners.get(id).copied()
    }

    /// Send, wait for confirmation, then apply `effect` atomically
    async fn transact<F>(
        &self,
        method: &'static str,
        ids: &[SummonerId],
        approve: &[SummonerId],
        effect: F,
    ) -> Result<TxReceipt>
    where
        F: FnOnce(&mut LedgerState) -> Result<()>,
    {
        let rejected = {
            let mut state = self.state.lock();
            state.submissions += 1;
            state.calls.push(ChainCall::Submitted {
                method,
                ids: ids.to_vec(),
                approve: approve.to_vec(),
            });
            state.reject_submission == Some(state.submissions)
        };

        if !self.confirmation_delay.is_zero() {
            tokio::time::sleep(self.confirmation_delay).await;
        }

        let mut state = self.state.lock();
        let outcome = if rejected {
            Err(PlayError::chain("transaction reverted"))
        } else {
            effect(&mut state)
        };

        match outcome {
            Ok(()) => {
                state.block += 1;
                let block = state.block;
                state.calls.push(ChainCall::Confirmed { method, block });
                debug!(method, block, ids = ids.len(), "Transaction confirmed");
                Ok(TxReceipt {
                    hash: format!("0x{:064x}", block),
                    block_number: block,
                })
            }
            Err(e) => {
                state.calls.push(ChainCall::Rejected {
                    method,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

impl WalletProvider for MemoryChain {
    fn context(&self) -> WalletContext {
        if self.state.lock().disconnected {
            return WalletContext {
                account: None,
                chain_id: Some(CHAIN_ID),
                visible: true,
            };
        }
        WalletContext::new(self.signer, CHAIN_ID)
    }
}

#[async_trait]
impl SummonerSource for MemoryChain {
    async fn owned_summoners(&self, owner: Address) -> Result<Vec<SummonerId>> {
        let state = self.state.lock();
        if state.source_down {
            return Err(PlayError::Fetch("indexer unavailable".to_string()));
        }
        Ok(state
            .summoners
            .iter()
            .filter(|s| state.owners.get(&s.id) == Some(&owner))
            .map(|s| s.id.clone())
            .collect())
    }

    async fn summoners_full(&self, ids: &[SummonerId]) -> Result<Vec<Summoner>> {
        let state = self.state.lock();
        if state.source_down {
            return Err(PlayError::Fetch("library contract unavailable".to_string()));
        }
        ids.iter()
            .map(|id| {
                state
                    .summoners
                    .iter()
                    .find(|s| &s.id == id)
                    .cloned()
                    .ok_or_else(|| PlayError::Fetch(format!("summoner {} not found", id)))
            })
            .collect()
    }
}

#[async_trait]
impl HelperContract for MemoryChain {
    async fn is_approved(&self, ids: &[SummonerId]) -> Result<Vec<bool>> {
        let mut state = self.state.lock();
        state.calls.push(ChainCall::IsApproved { ids: ids.to_vec() });
        if state.oracle_down {
            return Err(PlayError::chain("is_approved call failed"));
        }
        Ok(ids
            .iter()
            .map(|id| {
                let owner = state.owners.get(id).copied().unwrap_or_default();
                state.helper_approved.contains(id)
                    || state.operators.contains(&(owner, self.helper))
            })
            .collect())
    }

    async fn adventure(&self, ids: &[SummonerId]) -> Result<TxReceipt> {
        let (signer, helper) = (self.signer, self.helper);
        self.transact("adventure", ids, &[], |state| {
            let now = state.now;
            for id in ids {
                state.require_helper(id, signer, helper)?;
                let index = state.index_of(id)?;
                if !state.summoners[index].can_adventure(now) {
                    return Err(PlayError::chain(format!("summoner {} is resting", id)));
                }
            }
            for id in ids {
                let index = state.index_of(id)?;
                let summoner = &mut state.summoners[index];
                summoner.adventure_log = now + DAY;
                summoner.xp += ADVENTURE_XP;
            }
            Ok(())
        })
        .await
    }

    async fn level_up(&self, ids: &[SummonerId]) -> Result<TxReceipt> {
        let (signer, helper) = (self.signer, self.helper);
        self.transact("level_up", ids, &[], |state| {
            for id in ids {
                state.require_helper(id, signer, helper)?;
                let index = state.index_of(id)?;
                if !state.summoners[index].can_level_up() {
                    return Err(PlayError::chain(format!("summoner {} lacks xp", id)));
                }
            }
            for id in ids {
                let index = state.index_of(id)?;
                let summoner = &mut state.summoners[index];
                summoner.xp -= xp_required(summoner.level) * WEI_PER_UNIT;
                summoner.level += 1;
            }
            Ok(())
        })
        .await
    }

    async fn claim_gold(&self, ids: &[SummonerId], approve: &[SummonerId]) -> Result<TxReceipt> {
        let (signer, helper) = (self.signer, self.helper);
        self.transact("claim_gold", ids, approve, |state| {
            state.require_helper_with(ids, approve, signer, helper)?;
            state.helper_approved.extend(approve.iter().cloned());
            for id in ids {
                let index = state.index_of(id)?;
                state.summoners[index].claimable_gold = 0;
            }
            Ok(())
        })
        .await
    }

    async fn cellar(&self, ids: &[SummonerId], approve: &[SummonerId]) -> Result<TxReceipt> {
        let (signer, helper) = (self.signer, self.helper);
        self.transact("cellar", ids, approve, |state| {
            let now = state.now;
            state.require_helper_with(ids, approve, signer, helper)?;
            state.helper_approved.extend(approve.iter().cloned());
            for id in ids {
                let index = state.index_of(id)?;
                state.summoners[index].cellar_log = now + DAY;
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SummonerContract for MemoryChain {
    async fn is_approved_for_all(&self, owner: Address, operator: Address) -> Result<bool> {
        Ok(self.state.lock().operators.contains(&(owner, operator)))
    }

    async fn set_approval_for_all(&self, operator: Address) -> Result<TxReceipt> {
        let signer = self.signer;
        self.transact("set_approval_for_all", &[], &[], |state| {
            state.operators.insert((signer, operator));
            Ok(())
        })
        .await
    }

    async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        id: &SummonerId,
    ) -> Result<TxReceipt> {
        let signer = self.signer;
        self.transact("transfer_from", std::slice::from_ref(id), &[], |state| {
            if from != signer {
                return Err(PlayError::chain("signer is not the sender"));
            }
            state.require_owner(id, from)?;
            state.owners.insert(id.clone(), to);
            state.helper_approved.remove(id);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl DaycareContract for MemoryChain {
    async fn days_paid(&self, id: &SummonerId) -> Result<u32> {
        let state = self.state.lock();
        let index = state.index_of(id)?;
        Ok(state.summoners[index].daycare_days)
    }

    async fn register_daycare(&self, ids: &[SummonerId], days: u32) -> Result<TxReceipt> {
        self.transact("register_daycare", ids, &[], |state| {
            if days == 0 {
                return Err(PlayError::chain("days must be positive"));
            }
            for id in ids {
                let index = state.index_of(id)?;
                let summoner = &mut state.summoners[index];
                summoner.daycare_days = summoner.daycare_days.saturating_add(days);
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::SummonerClass;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Address::new(bytes)
    }

    fn summoner(id: u64) -> Summoner {
        Summoner {
            id: SummonerId::from(id),
            name: format!("s{}", id),
            class: SummonerClass::Rogue,
            level: 1,
            xp: 0,
            adventure_log: 0,
            cellar_log: 0,
            scout: 1,
            claimable_gold: 0,
            daycare_days: 0,
        }
    }

    #[tokio::test]
    async fn test_adventure_requires_operator_approval() {
        let chain = MemoryChain::new(addr(1), addr(9));
        chain.set_now(100);
        chain.mint(addr(1), [summoner(1)]);

        let ids = vec![SummonerId::from(1)];
        assert!(chain.adventure(&ids).await.is_err());

        chain.set_approval_for_all(addr(9)).await.unwrap();
        let receipt = chain.adventure(&ids).await.unwrap();
        assert_eq!(receipt.block_number, 2);

        let s = chain.summoner(&ids[0]).unwrap();
        assert_eq!(s.adventure_log, 100 + DAY);
        assert_eq!(s.xp, ADVENTURE_XP);
    }

    #[tokio::test]
    async fn test_cellar_approves_listed_summoners() {
        let chain = MemoryChain::new(addr(1), addr(9));
        chain.set_now(100);
        chain.mint(addr(1), [summoner(1), summoner(2)]);

        let ids = vec![SummonerId::from(1), SummonerId::from(2)];
        assert_eq!(chain.is_approved(&ids).await.unwrap(), vec![false, false]);

        chain.cellar(&ids, &ids).await.unwrap();
        assert_eq!(chain.is_approved(&ids).await.unwrap(), vec![true, true]);
    }

    #[tokio::test]
    async fn test_reverted_cellar_leaves_no_approvals() {
        let chain = MemoryChain::new(addr(1), addr(9));
        chain.set_now(100);
        chain.mint(addr(1), [summoner(1), summoner(2)]);

        let ids = vec![SummonerId::from(1), SummonerId::from(2)];
        let approve = vec![SummonerId::from(1)];
        assert!(chain.cellar(&ids, &approve).await.is_err());
        assert_eq!(chain.is_approved(&ids).await.unwrap(), vec![false, false]);
        assert_eq!(chain.summoner(&ids[0]).unwrap().cellar_log, 0);

        assert!(chain.claim_gold(&ids, &approve).await.is_err());
        assert_eq!(chain.is_approved(&ids).await.unwrap(), vec![false, false]);
    }

    #[tokio::test]
    async fn test_daycare_days_saturate() {
        let chain = MemoryChain::new(addr(1), addr(9));
        let mut s = summoner(1);
        s.daycare_days = u32::MAX - 1;
        chain.mint(addr(1), [s]);

        let ids = vec![SummonerId::from(1)];
        chain.register_daycare(&ids, 5).await.unwrap();
        assert_eq!(chain.days_paid(&ids[0]).await.unwrap(), u32::MAX);
    }

    #[test]
    fn test_disconnected_wallet_has_no_account() {
        let chain = MemoryChain::new(addr(1), addr(9));
        assert_eq!(chain.context().ready_account(), Some(addr(1)));
        chain.set_connected(false);
        assert_eq!(chain.context().ready_account(), None);
    }

    #[tokio::test]
    async fn test_rejected_submission_is_logged() {
        let chain = MemoryChain::new(addr(1), addr(9));
        chain.mint(addr(1), [summoner(1)]);
        chain.reject_submission(1);

        let ids = vec![SummonerId::from(1)];
        assert!(chain.register_daycare(&ids, 3).await.is_err());
        assert!(matches!(chain.calls().last(), Some(ChainCall::Rejected { .. })));
        assert_eq!(chain.summoner(&ids[0]).unwrap().daycare_days, 0);

        chain.register_daycare(&ids, 3).await.unwrap();
        assert_eq!(chain.days_paid(&ids[0]).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_transfer_changes_owner() {
        let chain = MemoryChain::new(addr(1), addr(9));
        chain.mint(addr(1), [summoner(5)]);
        let id = SummonerId::from(5);

        chain.transfer_from(addr(1), addr(2), &id).await.unwrap();
        assert_eq!(chain.owner_of(&id), Some(addr(2)));
        assert!(chain.owned_summoners(addr(1)).await.unwrap().is_empty());
        assert!(chain.transfer_from(addr(1), addr(3), &id).await.is_err());
    }
}
