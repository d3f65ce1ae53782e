//! Core functionality for the dashboard
//!
//! Data models, collaborator traits, batch submission, roster loading,
//! selection state and the operations that tie them together.

pub mod batch;
pub mod chain;
pub mod loader;
pub mod models;
pub mod notify;
pub mod play;
pub mod selection;
pub mod traits;

// Re-export commonly used types
pub use batch::{BatchReport, BatchSubmitter, BulkAction, RunState};
pub use loader::{RefreshOutcome, RosterLoader, RosterSnapshot};
pub use play::PlayService;
pub use selection::{Modal, SelectionController, View};
