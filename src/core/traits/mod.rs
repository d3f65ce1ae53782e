//! Core traits module
//!
//! Contains the interfaces of every external collaborator

pub mod chain;

pub use chain::*;
