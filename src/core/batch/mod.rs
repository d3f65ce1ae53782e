//! Batched bulk-action submission
//!
//! Splits summoner id lists into per-call chunks, checks helper approval per
//! chunk, and submits the chunks strictly in order.

mod action;
mod chunk;
mod driver;
mod eligibility;


// Re-export all public types
pub use action::BulkAction;
pub use chunk::{chunk, chunk_count};
pub use driver::{BatchReport, BatchSubmitter, ChunkReceipt, RunFailure, RunState};
pub use eligibility::{EligibilityPartition, partition};
