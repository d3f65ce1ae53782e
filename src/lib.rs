//! # rarity-play
//!
//! Client core for the Rarity play dashboard. It loads the summoners owned by
//! the connected wallet, tracks which one is selected, and sends bulk actions
//! (adventure, level up, claim gold, cellar, daycare) to the helper contracts
//! in bounded chunks, one confirmed transaction at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rarity_play::core::chain::{ChainClients, MemoryChain};
//! use rarity_play::core::notify::TracingSink;
//! use rarity_play::{Config, PlayService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/play.yaml").await?;
//!     let chain = Arc::new(MemoryChain::new(
//!         "0x00000000000000000000000000000000000000a1".parse()?,
//!         config.contracts().helper,
//!     ));
//!
//!     let service = PlayService::new(
//!         config.play.clone(),
//!         chain.clone(),
//!         chain.clone(),
//!         ChainClients::from_single(chain),
//!         Arc::new(TracingSink),
//!     );
//!     service.refresh().await?;
//!     service.approve_helper().await?;
//!     let report = service.send_adventure().await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::PlayService;
pub use core::batch::{BatchReport, BulkAction, RunState};
pub use core::models::{Activity, Address, Roster, Summoner, SummonerId};
pub use utils::error::{PlayError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build metadata baked in by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_time: &'static str,
    pub git_hash: &'static str,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        build_time: env!("BUILD_TIME"),
        git_hash: env!("GIT_HASH"),
    }
}
