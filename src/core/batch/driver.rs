//! Sequential batch submission
//!
//! A run splits the id list into chunks and sends them one at a time. Each
//! chunk is confirmed before the next one starts. The first failure stops the
//! run; chunks confirmed before it stay confirmed.

use super::action::BulkAction;
use super::chunk::chunk;
use super::eligibility::partition;
use crate::core::chain::ChainClients;
use crate::core::models::{SummonerId, TxReceipt};
use crate::core::notify::{NotificationMessages, Notifier};
use crate::utils::error::{PlayError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Where the driver currently is. Chunk positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// No run has started yet
    Idle,
    /// Chunk `chunk` of `total` is being checked or submitted
    Submitting { chunk: usize, total: usize },
    /// Every chunk was confirmed
    Completed { chunks: usize },
    /// Chunk `chunk` failed after `completed` chunks were confirmed
    Failed {
        chunk: usize,
        total: usize,
        completed: usize,
    },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed { .. } | RunState::Failed { .. })
    }
}

/// A confirmed chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReceipt {
    /// 1-based chunk position
    pub chunk: usize,
    pub ids: Vec<SummonerId>,
    /// Ids that were sent for approval along with the chunk
    pub needs_action: Vec<SummonerId>,
    pub receipt: TxReceipt,
}

/// Why a run stopped early
#[derive(Debug)]
pub struct RunFailure {
    /// 1-based position of the failing chunk
    pub chunk: usize,
    pub error: PlayError,
}

/// Outcome of one run
#[derive(Debug)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub action: BulkAction,
    pub total_chunks: usize,
    pub receipts: Vec<ChunkReceipt>,
    pub state: RunState,
    pub failure: Option<RunFailure>,
}

impl BatchReport {
    pub fn completed_chunks(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Ids whose chunk was confirmed, in submission order
    pub fn confirmed_ids(&self) -> Vec<SummonerId> {
        self.receipts
            .iter()
            .flat_map(|r| r.ids.iter().cloned())
            .collect()
    }

    /// "N of K chunks completed"
    pub fn summary(&self) -> String {
        format!(
            "{} of {} chunks completed",
            self.completed_chunks(),
            self.total_chunks
        )
    }

    /// Turn a stopped run into its error, keeping chunk position context
    pub fn into_result(mut self) -> Result<BatchReport> {
        let Some(failure) = self.failure.take() else {
            return Ok(self);
        };
        let total = self.total_chunks;
        let completed = self.receipts.len();
        Err(match failure.error {
            PlayError::EligibilityCheck(message) => PlayError::EligibilityCheck(format!(
                "chunk {} of {} ({} of {} chunks completed): {}",
                failure.chunk, total, completed, total, message
            )),
            PlayError::Validation(message) => PlayError::Validation(message),
            other => PlayError::Submission {
                chunk: failure.chunk,
                total,
                completed,
                message: other.to_string(),
            },
        })
    }
}

/// Drives bulk actions chunk by chunk
pub struct BatchSubmitter {
    clients: ChainClients,
    notifier: Notifier,
    chunk_size: usize,
    state: watch::Sender<RunState>,
    in_flight: Mutex<()>,
}

impl BatchSubmitter {
    pub fn new(clients: ChainClients, notifier: Notifier, chunk_size: usize) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            clients,
            notifier,
            chunk_size,
            state,
            in_flight: Mutex::new(()),
        }
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Follow run state transitions
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Run `action` over `ids`.
    ///
    /// Runs never overlap: a second call waits for the first to finish.
    /// There is no retry and no skipping of already confirmed chunks; resume
    /// by calling again with the remaining ids.
    pub async fn run(&self, action: &BulkAction, ids: &[SummonerId]) -> BatchReport {
        let _guard = self.in_flight.lock().await;
        let run_id = Uuid::new_v4();
        let limit = action.per_call_limit(self.chunk_size);

        let chunks = match chunk(ids, limit) {
            Ok(chunks) => chunks,
            Err(e) => {
                error!(%run_id, action = %action, "Cannot chunk ids: {}", e);
                let state = RunState::Failed {
                    chunk: 1,
                    total: 0,
                    completed: 0,
                };
                self.state.send_replace(state);
                return BatchReport {
                    run_id,
                    action: action.clone(),
                    total_chunks: 0,
                    receipts: Vec::new(),
                    state,
                    failure: Some(RunFailure { chunk: 1, error: e }),
                };
            }
        };

        let total = chunks.len();
        info!(%run_id, action = %action, ids = ids.len(), chunks = total, "Starting batch run");

        let mut receipts = Vec::with_capacity(total);
        for (index, ids) in chunks.into_iter().enumerate() {
            let position = index + 1;
            self.state.send_replace(RunState::Submitting {
                chunk: position,
                total,
            });

            match self.submit_chunk(action, &ids, position, total).await {
                Ok((needs_action, receipt)) => {
                    debug!(%run_id, chunk = position, total, block = receipt.block_number, "Chunk confirmed");
                    receipts.push(ChunkReceipt {
                        chunk: position,
                        ids,
                        needs_action,
                        receipt,
                    });
                }
                Err(e) => {
                    let completed = receipts.len();
                    error!(
                        %run_id,
                        chunk = position,
                        total,
                        completed,
                        category = ?e.category(),
                        "Batch run stopped: {}",
                        e
                    );
                    let state = RunState::Failed {
                        chunk: position,
                        total,
                        completed,
                    };
                    self.state.send_replace(state);
                    return BatchReport {
                        run_id,
                        action: action.clone(),
                        total_chunks: total,
                        receipts,
                        state,
                        failure: Some(RunFailure {
                            chunk: position,
                            error: e,
                        }),
                    };
                }
            }
        }

        let state = RunState::Completed { chunks: total };
        self.state.send_replace(state);
        info!(%run_id, action = %action, chunks = total, "Batch run completed");
        BatchReport {
            run_id,
            action: action.clone(),
            total_chunks: total,
            receipts,
            state,
            failure: None,
        }
    }

    async fn submit_chunk(
        &self,
        action: &BulkAction,
        ids: &[SummonerId],
        position: usize,
        total: usize,
    ) -> Result<(Vec<SummonerId>, TxReceipt)> {
        let needs_action = if action.requires_eligibility() {
            match partition(self.clients.helper.as_ref(), ids).await {
                Ok(split) => split.needs_action,
                Err(e) => {
                    self.notifier.fail(
                        format!("Failed to check approvals for chunk {} of {}", position, total),
                        e.to_string(),
                    );
                    return Err(e);
                }
            }
        } else {
            Vec::new()
        };

        let messages =
            NotificationMessages::new(format!("Sending chunk: {} of {}", position, total));
        let receipt = self
            .notifier
            .track(messages, self.clients.submit(action, ids, &needs_action))
            .await?;
        Ok((needs_action, receipt))
    }
}

impl std::fmt::Debug for BatchSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchSubmitter")
            .field("chunk_size", &self.chunk_size)
            .field("state", &self.state())
            .finish()
    }
}
