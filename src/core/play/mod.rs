//! Dashboard operations
//!
//! [`PlayService`] ties the roster loader, the selection controller and the
//! batch driver to the player's actions. Every operation reports its outcome
//! through the notifier: one loading event and one terminal event for work
//! that reaches the chain, a single error event for work rejected up front.

use crate::config::PlayConfig;
use crate::core::batch::{
    BatchReport, BatchSubmitter, BulkAction, RunFailure, RunState, partition,
};
use crate::core::chain::ChainClients;
use crate::core::loader::{RefreshOutcome, RosterLoader, RosterSnapshot, spawn_refresh_task};
use crate::core::models::{Activity, Address, SummonerId, TxReceipt, WalletContext};
use crate::core::notify::{NotificationMessages, NotificationSink, Notifier};
use crate::core::selection::{Modal, SelectionController, View};
use crate::core::traits::{SummonerSource, WalletProvider};
use crate::utils::error::{PlayError, Result};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};


/// Source of the current unix time in seconds
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Selection state plus the roster generation it was last synced to
#[derive(Debug, Default)]
struct SyncedSelection {
    generation: u64,
    controller: SelectionController,
}

/// The dashboard's operations over one wallet
pub struct PlayService {
    wallet: Arc<dyn WalletProvider>,
    clients: ChainClients,
    notifier: Notifier,
    config: PlayConfig,
    loader: Arc<RosterLoader>,
    selection: Mutex<SyncedSelection>,
    submitter: BatchSubmitter,
    clock: Clock,
}

impl PlayService {
    pub fn new(
        config: PlayConfig,
        wallet: Arc<dyn WalletProvider>,
        source: Arc<dyn SummonerSource>,
        clients: ChainClients,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let notifier = Notifier::new(sink);
        let loader = Arc::new(RosterLoader::new(
            source,
            clients.summoner.clone(),
            config.contracts.helper,
        ));
        let submitter =
            BatchSubmitter::new(clients.clone(), notifier.clone(), config.batch.chunk_size);

        Self {
            wallet,
            clients,
            notifier,
            config,
            loader,
            selection: Mutex::new(SyncedSelection::default()),
            submitter,
            clock: Arc::new(|| chrono::Utc::now().timestamp().max(0) as u64),
        }
    }

    /// Replace the wall clock used to pick candidates
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    pub fn loader(&self) -> Arc<RosterLoader> {
        self.loader.clone()
    }

    /// Latest published roster snapshot
    pub fn snapshot(&self) -> Arc<RosterSnapshot> {
        self.loader.snapshot()
    }

    pub fn helper_approved(&self) -> bool {
        self.loader.snapshot().helper_approved
    }

    pub fn run_state(&self) -> RunState {
        self.submitter.state()
    }

    pub fn subscribe_runs(&self) -> watch::Receiver<RunState> {
        self.submitter.subscribe()
    }

    /// Keep the roster in step with wallet context changes
    pub fn spawn_refresh(&self, contexts: watch::Receiver<WalletContext>) -> JoinHandle<()> {
        spawn_refresh_task(self.loader.clone(), contexts, self.notifier.clone())
    }

    /// Fetch the roster for the wallet's current context
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let context = self.wallet.context();
        match self.loader.refresh(&context).await {
            Ok(outcome) => {
                self.sync_selection();
                Ok(outcome)
            }
            Err(e) => Err(self.reject("Failed to load summoners", e)),
        }
    }

    /// Candidate ids for `activity` in the current roster
    pub fn candidates(&self, activity: Activity) -> Vec<SummonerId> {
        self.loader
            .snapshot()
            .roster
            .candidates(activity, (self.clock)())
    }

    // Selection

    /// Copy of the selection state, synced to the latest roster
    pub fn selection(&self) -> SelectionController {
        self.sync_selection().controller.clone()
    }

    pub fn select_next(&self) {
        self.sync_selection().controller.select_next();
    }

    pub fn select_previous(&self) {
        self.sync_selection().controller.select_previous();
    }

    pub fn select(&self, id: &SummonerId) -> Result<()> {
        let result = self.sync_selection().controller.select_explicit(id);
        result.map_err(|e| self.reject("Summoner not found", e))
    }

    pub fn set_view(&self, view: View) {
        self.sync_selection().controller.set_view(view);
    }

    pub fn toggle_modal(&self, modal: Modal) {
        self.sync_selection().controller.toggle_modal(modal);
    }

    pub fn close_modal(&self) {
        self.sync_selection().controller.close_modal();
    }

    // Helper approval

    /// Grant the helper blanket approval over the account's summoners
    pub async fn approve_helper(&self) -> Result<TxReceipt> {
        self.account()?;
        let helper = self.config.contracts.helper;
        let receipt = self
            .notifier
            .track(
                NotificationMessages::new("Approving helper contract"),
                self.clients.summoner.set_approval_for_all(helper),
            )
            .await?;

        self.loader.mark_helper_approved();
        info!(%helper, block = receipt.block_number, "Helper approved");
        Ok(receipt)
    }

    // Bulk actions

    pub async fn send_adventure(&self) -> Result<BatchReport> {
        self.send_activity(Activity::Adventure).await
    }

    pub async fn send_level_up(&self) -> Result<BatchReport> {
        self.send_activity(Activity::LevelUp).await
    }

    pub async fn send_claim_gold(&self) -> Result<BatchReport> {
        self.send_activity(Activity::ClaimGold).await
    }

    pub async fn send_cellar(&self) -> Result<BatchReport> {
        self.send_activity(Activity::Cellar).await
    }

    async fn send_activity(&self, activity: Activity) -> Result<BatchReport> {
        self.account()?;
        let action = BulkAction::from(activity);
        let snapshot = self.loader.snapshot();

        if action.requires_operator_approval() && !snapshot.helper_approved {
            return Err(self.reject(
                "Helper contract not approved",
                PlayError::ApprovalRequired(format!(
                    "{} needs the helper approved for all summoners",
                    action
                )),
            ));
        }

        let ids = snapshot.roster.candidates(activity, (self.clock)());
        self.run_batch(action, ids).await
    }

    async fn run_batch(&self, action: BulkAction, ids: Vec<SummonerId>) -> Result<BatchReport> {
        if ids.is_empty() {
            return Err(self.reject(
                "Nothing to send",
                PlayError::validation("No summoners available"),
            ));
        }

        debug!(action = %action, ids = ids.len(), "Submitting bulk action");
        let report = self.submitter.run(&action, &ids).await;

        // The driver reports chunk failures itself; a run that never produced
        // a chunk is reported here
        if report.total_chunks == 0 {
            if let Some(RunFailure { error, .. }) = &report.failure {
                self.notifier.fail("Cannot split summoners", error.to_string());
            }
        }

        if report.completed_chunks() > 0 {
            self.reload().await;
        }
        report.into_result()
    }

    /// Claim gold for the selected summoner only
    pub async fn claim_gold_selected(&self) -> Result<TxReceipt> {
        self.account()?;
        let id = self.selected_id()?;
        let claimable = self
            .loader
            .snapshot()
            .roster
            .find(&id)
            .is_some_and(|s| s.can_claim_gold());
        if !claimable {
            return Err(self.reject(
                "Nothing to claim",
                PlayError::Validation(format!("Summoner {} has no gold to claim", id)),
            ));
        }

        let split = partition(self.clients.helper.as_ref(), std::slice::from_ref(&id))
            .await
            .map_err(|e| self.reject("Failed to check approvals", e))?;
        self.send_single(BulkAction::ClaimGold, id, &split.needs_action, "Claiming gold")
            .await
    }

    // Daycare

    /// Days already paid for the selected summoner
    pub async fn daycare_days(&self) -> Result<u32> {
        let id = self.selected_id()?;
        self.clients
            .daycare
            .days_paid(&id)
            .await
            .map_err(|e| self.reject("Failed to load daycare days", e))
    }

    /// Total fee for registering `summoners` for `days`
    pub fn daycare_quote(&self, summoners: usize, days: u32) -> u128 {
        self.config.daycare.quote(summoners, days)
    }

    pub async fn register_daycare_selected(&self, days: u32) -> Result<TxReceipt> {
        self.account()?;
        self.check_days(days)?;
        let id = self.selected_id()?;
        self.close_modal();

        self.send_single(BulkAction::Daycare { days }, id, &[], "Registering summoner")
            .await
    }

    pub async fn register_daycare_all(&self, days: u32) -> Result<BatchReport> {
        self.account()?;
        self.check_days(days)?;
        self.close_modal();
        let ids = self.loader.snapshot().roster.ids();
        self.run_batch(BulkAction::Daycare { days }, ids).await
    }

    fn check_days(&self, days: u32) -> Result<()> {
        let max = self.config.daycare.max_days;
        if days == 0 || days > max {
            return Err(self.reject(
                "Invalid number of days",
                PlayError::Validation(format!("Days must be between 1 and {}, got {}", max, days)),
            ));
        }
        Ok(())
    }

    // Transfer and delete

    /// Send the selected summoner to `address`
    pub async fn transfer_selected(&self, address: &str) -> Result<TxReceipt> {
        let to: Address = address
            .parse()
            .map_err(|e| self.reject("Invalid address", e))?;
        if to.is_zero() {
            return Err(self.reject(
                "Invalid address",
                PlayError::validation("Cannot transfer to the zero address"),
            ));
        }
        let from = self.account()?;
        let id = self.selected_id()?;
        self.close_modal();

        self.send_single(BulkAction::Transfer { from, to }, id, &[], "Transferring summoner")
            .await
    }

    /// Send the selected summoner to the burn address
    pub async fn delete_selected(&self) -> Result<TxReceipt> {
        let from = self.account()?;
        let id = self.selected_id()?;
        self.close_modal();

        let burn = self.config.contracts.burn;
        self.send_single(BulkAction::Delete { from, burn }, id, &[], "Deleting summoner")
            .await
    }

    async fn send_single(
        &self,
        action: BulkAction,
        id: SummonerId,
        approve: &[SummonerId],
        loading: &str,
    ) -> Result<TxReceipt> {
        info!(action = %action, summoner = %id, "Sending summoner");
        let receipt = self
            .notifier
            .track(
                NotificationMessages::new(loading),
                self.clients.submit(&action, std::slice::from_ref(&id), approve),
            )
            .await?;
        self.reload().await;
        Ok(receipt)
    }

    // Internals

    fn sync_selection(&self) -> MutexGuard<'_, SyncedSelection> {
        let snapshot = self.loader.snapshot();
        let mut selection = self.selection.lock();
        if selection.generation != snapshot.generation {
            selection.controller.set_collection(snapshot.roster.clone());
            selection.generation = snapshot.generation;
        }
        selection
    }

    fn selected_id(&self) -> Result<SummonerId> {
        let selected = self.sync_selection().controller.selected_id().cloned();
        selected.ok_or_else(|| {
            self.reject(
                "No summoner selected",
                PlayError::NotFound("No summoner selected".to_string()),
            )
        })
    }

    fn account(&self) -> Result<Address> {
        self.wallet.context().ready_account().ok_or_else(|| {
            self.reject(
                "Wallet not connected",
                PlayError::validation("Connect a wallet on a supported network"),
            )
        })
    }

    /// Refresh after a confirmed action; failures keep the previous roster
    async fn reload(&self) {
        match self.loader.refresh(&self.wallet.context()).await {
            Ok(_) => {
                self.sync_selection();
            }
            Err(e) => warn!("Roster reload after action failed: {}", e),
        }
    }

    /// Report a failure that never reached the chain
    fn reject(&self, message: &str, err: PlayError) -> PlayError {
        if err.is_local() {
            warn!(category = ?err.category(), "{}: {}", message, err);
        } else {
            error!(category = ?err.category(), "{}: {}", message, err);
        }
        self.notifier.fail(message, err.to_string());
        err
    }
}

impl std::fmt::Debug for PlayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayService")
            .field("config", &self.config)
            .field("loader", &self.loader)
            .field("submitter", &self.submitter)
            .finish()
    }
}
