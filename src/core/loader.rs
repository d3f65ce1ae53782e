//! Roster loading
//!
//! Each refresh is tagged with a generation. A result is only published when
//! no newer refresh has started since, so a slow fetch for an old account or
//! network can never overwrite fresher state. Failed refreshes leave the last
//! good snapshot in place.

use crate::core::models::{Address, Roster, WalletContext};
use crate::core::notify::Notifier;
use crate::core::traits::{SummonerContract, SummonerSource};
use crate::utils::error::{PlayError, Result};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use futures::future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything fetched for one wallet context
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub generation: u64,
    pub context: WalletContext,
    pub roster: Arc<Roster>,
    /// Whether the helper holds blanket approval for the account
    pub helper_approved: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// What a refresh did
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// A new snapshot was published
    Updated(Arc<RosterSnapshot>),
    /// A newer refresh started first; this result was dropped
    Stale { generation: u64 },
    /// The wallet is not connected, on no network, or hidden
    Skipped,
}

/// Fetches and publishes roster snapshots
pub struct RosterLoader {
    source: Arc<dyn SummonerSource>,
    contract: Arc<dyn SummonerContract>,
    helper: Address,
    snapshot: ArcSwap<RosterSnapshot>,
    generation: AtomicU64,
}

impl RosterLoader {
    pub fn new(
        source: Arc<dyn SummonerSource>,
        contract: Arc<dyn SummonerContract>,
        helper: Address,
    ) -> Self {
        Self {
            source,
            contract,
            helper,
            snapshot: ArcSwap::from_pointee(RosterSnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<RosterSnapshot> {
        self.snapshot.load_full()
    }

    /// Generation of the most recently started refresh
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Make every in-flight refresh stale
    pub fn invalidate(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetch the roster and helper approval for `context`
    pub async fn refresh(&self, context: &WalletContext) -> Result<RefreshOutcome> {
        let Some(account) = context.ready_account() else {
            debug!(?context, "Wallet not ready, skipping refresh");
            return Ok(RefreshOutcome::Skipped);
        };

        let generation = self.invalidate();
        debug!(generation, %account, "Refreshing roster");

        let (roster, helper_approved) = match self.fetch(account).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(generation, %account, "Roster refresh failed: {}", e);
                return Err(e);
            }
        };

        if self.generation() != generation {
            debug!(generation, "Discarding stale roster fetch");
            return Ok(RefreshOutcome::Stale { generation });
        }

        let fresh = Arc::new(RosterSnapshot {
            generation,
            context: context.clone(),
            roster: Arc::new(roster),
            helper_approved,
            fetched_at: Some(Utc::now()),
        });

        let previous = self.snapshot.rcu(|current| {
            if current.generation > generation {
                current.clone()
            } else {
                fresh.clone()
            }
        });
        if previous.generation > generation {
            return Ok(RefreshOutcome::Stale { generation });
        }

        info!(
            generation,
            summoners = fresh.roster.len(),
            helper_approved,
            "Roster refreshed"
        );
        Ok(RefreshOutcome::Updated(fresh))
    }

    /// Publish a copy of the current snapshot with helper approval granted
    pub fn mark_helper_approved(&self) {
        self.snapshot.rcu(|current| {
            let mut next = RosterSnapshot::clone(current);
            next.helper_approved = true;
            Arc::new(next)
        });
    }

    async fn fetch(&self, account: Address) -> Result<(Roster, bool)> {
        let roster = async {
            let ids = self.source.owned_summoners(account).await?;
            let summoners = self.source.summoners_full(&ids).await?;
            if summoners.len() != ids.len() {
                return Err(PlayError::Fetch(format!(
                    "Expected {} summoners, got {}",
                    ids.len(),
                    summoners.len()
                )));
            }
            Roster::new(summoners)
        };
        let approval = self.contract.is_approved_for_all(account, self.helper);

        future::try_join(roster, approval)
            .await
            .map_err(as_fetch_error)
    }
}

impl std::fmt::Debug for RosterLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterLoader")
            .field("helper", &self.helper)
            .field("generation", &self.generation())
            .finish()
    }
}

fn as_fetch_error(err: PlayError) -> PlayError {
    match err {
        PlayError::Fetch(_) => err,
        other => PlayError::Fetch(other.to_string()),
    }
}

/// Refresh whenever the wallet context changes.
///
/// A context change while a fetch is in flight abandons that fetch and
/// starts over with the new context. Failed fetches are reported through
/// `notifier`. The task ends when the sender is dropped.
pub fn spawn_refresh_task(
    loader: Arc<RosterLoader>,
    mut contexts: watch::Receiver<WalletContext>,
    notifier: Notifier,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let context = contexts.borrow_and_update().clone();

            let fetched = tokio::select! {
                result = loader.refresh(&context) => Some(result),
                changed = contexts.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!("Wallet context changed, abandoning in-flight refresh");
                    None
                }
            };

            if let Some(result) = fetched {
                if let Err(e) = result {
                    warn!(category = ?e.category(), "Background roster refresh failed: {}", e);
                    notifier.fail("Failed to load summoners", e.to_string());
                }
                if contexts.changed().await.is_err() {
                    break;
                }
            }
        }
        debug!("Wallet context closed, refresh task exiting");
    })
}
