//! Validators for each configuration section

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for PlayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating play configuration");

        self.batch.validate()?;
        self.contracts.validate()?;
        self.daycare.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Batch chunk_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for ContractsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.helper.is_zero() {
            return Err("Helper contract address must be set".to_string());
        }

        if self.helper == self.burn {
            return Err("Helper and burn addresses must differ".to_string());
        }

        Ok(())
    }
}

impl Validate for DaycareConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_days == 0 {
            return Err("Daycare max_days must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
