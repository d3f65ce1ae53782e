//! Integration tests
//!
//! Each module drives the public API against the in-memory chain.

pub mod batch_flow_tests;
pub mod config_tests;
pub mod refresh_tests;
pub mod selection_tests;
