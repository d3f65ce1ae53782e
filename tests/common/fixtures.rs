//! Test fixtures and data factories
//!
//! Everything here builds real values; the chain is the in-memory ledger.

use rarity_play::config::PlayConfig;
use rarity_play::core::chain::{ChainClients, MemoryChain};
use rarity_play::core::models::{SummonerClass, WEI_PER_UNIT};
use rarity_play::core::notify::{NotificationKind, RecordingSink};
use rarity_play::{Address, PlayService, Summoner, SummonerId};
use std::sync::Arc;
use std::time::Duration;

/// Clock used by every fixture
pub const NOW: u64 = 1_700_000_000;

/// Address whose last byte is `last`
pub fn address(last: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = last;
    Address::new(bytes)
}

/// The account every harness signs with
pub fn account() -> Address {
    address(0xa1)
}

/// Helper operator address used by every harness
pub fn helper() -> Address {
    address(0x99)
}

/// Factory for summoner snapshots
pub struct SummonerFactory;

impl SummonerFactory {
    /// Fresh level-1 summoner with nothing to do but adventure
    pub fn create(id: u64) -> Summoner {
        Summoner {
            id: SummonerId::from(id),
            name: format!("Summoner #{}", id),
            class: SummonerClass::try_from(((id % 11) + 1) as u8).unwrap_or(SummonerClass::Fighter),
            level: 1,
            xp: 0,
            adventure_log: NOW - 60,
            cellar_log: NOW + 3_600,
            scout: 0,
            claimable_gold: 0,
            daycare_days: 0,
        }
    }

    /// Summoners `1..=n`
    pub fn many(n: u64) -> Vec<Summoner> {
        (1..=n).map(Self::create).collect()
    }

    /// Ready for the cellar with a non-zero expected reward
    pub fn cellar_ready(id: u64) -> Summoner {
        let mut summoner = Self::create(id);
        summoner.cellar_log = NOW - 60;
        summoner.scout = 2;
        summoner
    }

    /// Enough xp to leave level 1
    pub fn level_ready(id: u64) -> Summoner {
        let mut summoner = Self::create(id);
        summoner.xp = 1_000 * WEI_PER_UNIT;
        summoner
    }

    /// Resting until tomorrow
    pub fn resting(id: u64) -> Summoner {
        let mut summoner = Self::create(id);
        summoner.adventure_log = NOW + 86_400;
        summoner
    }
}

/// A service wired to an in-memory chain holding the given roster
pub struct Harness {
    pub chain: Arc<MemoryChain>,
    pub sink: Arc<RecordingSink>,
    pub service: PlayService,
}

impl Harness {
    pub fn new(summoners: Vec<Summoner>) -> Self {
        let mut config = PlayConfig::default();
        config.contracts.helper = helper();
        Self::with_config(summoners, config)
    }

    pub fn with_config(summoners: Vec<Summoner>, config: PlayConfig) -> Self {
        let chain = Arc::new(
            MemoryChain::new(account(), config.contracts.helper)
                .with_confirmation_delay(Duration::from_millis(1)),
        );
        chain.set_now(NOW);
        chain.mint(account(), summoners);

        let sink = Arc::new(RecordingSink::new());
        let service = PlayService::new(
            config,
            chain.clone(),
            chain.clone(),
            ChainClients::from_single(chain.clone()),
            sink.clone(),
        )
        .with_clock(|| NOW);

        Self {
            chain,
            sink,
            service,
        }
    }

    /// Load the roster and forget the notifications that produced
    pub async fn loaded(self) -> Self {
        crate::assert_ok!(self.service.refresh().await);
        self.sink.clear();
        self
    }

    /// Kinds of every notification so far
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.sink.events().iter().map(|n| n.kind).collect()
    }
}
