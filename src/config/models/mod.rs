//! Configuration data models

pub mod batch;
pub mod contracts;
pub mod daycare;
pub mod logging;
pub mod play;

// Re-export all configuration types
pub use batch::*;
pub use contracts::*;
pub use daycare::*;
pub use logging::*;
pub use play::*;

/// Default number of ids per helper call
pub fn default_chunk_size() -> usize {
    100
}

/// Default burn address for deleted summoners
pub fn default_burn_address() -> crate::core::models::Address {
    let mut bytes = [0u8; 20];
    bytes[18] = 0xde;
    bytes[19] = 0xad;
    crate::core::models::Address::new(bytes)
}

pub fn default_max_days() -> u32 {
    30
}

pub fn default_log_level() -> String {
    "info".to_string()
}
