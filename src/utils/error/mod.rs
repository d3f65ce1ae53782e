//! Error Handling utilities
//!
//! This module provides the crate error type and its taxonomy.

pub mod error;

// Re-export commonly used types
pub use error::*;
