//! Validation trait definition

/// Section-level configuration check; the message names the offending field
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
