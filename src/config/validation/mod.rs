//! Configuration validation

mod play_validators;
mod trait_def;

pub use trait_def::Validate;
