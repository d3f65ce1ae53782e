//! Error handling for the play core
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for the play core
pub type Result<T> = std::result::Result<T, PlayError>;

/// Main error type for the play core
#[derive(Error, Debug)]
pub enum PlayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Summoner or approval data could not be fetched
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The `is_approved` oracle failed or returned a misaligned answer
    #[error("Eligibility check failed: {0}")]
    EligibilityCheck(String),

    /// A chunk could not be submitted or was rejected on-chain
    #[error("Chunk {chunk} of {total} failed ({completed} of {total} chunks completed): {message}")]
    Submission {
        /// 1-based position of the failed chunk
        chunk: usize,
        /// Number of chunks in the run
        total: usize,
        /// Chunks confirmed before the failure
        completed: usize,
        /// Underlying failure
        message: String,
    },

    /// Input rejected before any call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Helper operator has not been approved for the account
    #[error("Approval required: {0}")]
    ApprovalRequired(String),

    /// Wallet or contract call errors
    #[error("Chain error: {0}")]
    Chain(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlayError {
    /// Create a chain error from anything displayable
    pub fn chain(message: impl std::fmt::Display) -> Self {
        Self::Chain(message.to_string())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error was raised before anything reached the chain
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            PlayError::Validation(_) | PlayError::NotFound(_) | PlayError::ApprovalRequired(_)
        )
    }

    /// Error category for notification and logging purposes
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlayError::Fetch(_)
            | PlayError::Serialization(_)
            | PlayError::Yaml(_)
            | PlayError::Io(_) => ErrorCategory::Fetch,
            PlayError::EligibilityCheck(_) => ErrorCategory::EligibilityCheck,
            PlayError::Submission { .. } | PlayError::Chain(_) => ErrorCategory::Submission,
            PlayError::Validation(_)
            | PlayError::NotFound(_)
            | PlayError::ApprovalRequired(_)
            | PlayError::Config(_) => ErrorCategory::Validation,
        }
    }
}

/// Coarse error taxonomy shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Data source or approval lookup failed
    Fetch,
    /// Oracle failure while splitting a chunk
    EligibilityCheck,
    /// Transaction submission or confirmation failed
    Submission,
    /// Rejected before any call
    Validation,
}
