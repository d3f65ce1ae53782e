//! Splitting a chunk by helper approval

use crate::core::models::SummonerId;
use crate::core::traits::HelperContract;
use crate::utils::error::{PlayError, Result};
use tracing::debug;

/// A chunk split into summoners the helper may already act on and the ones
/// it must approve first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityPartition {
    pub eligible: Vec<SummonerId>,
    pub needs_action: Vec<SummonerId>,
}

impl EligibilityPartition {
    /// Split `chunk` by the positionally aligned `approved` flags
    pub fn from_flags(chunk: &[SummonerId], approved: &[bool]) -> Result<Self> {
        if chunk.len() != approved.len() {
            return Err(PlayError::EligibilityCheck(format!(
                "Oracle returned {} answers for {} summoners",
                approved.len(),
                chunk.len()
            )));
        }

        let mut partition = Self::default();
        for (id, ok) in chunk.iter().zip(approved) {
            if *ok {
                partition.eligible.push(id.clone());
            } else {
                partition.needs_action.push(id.clone());
            }
        }
        Ok(partition)
    }

    pub fn len(&self) -> usize {
        self.eligible.len() + self.needs_action.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ask the helper which summoners of `chunk` are already approved
pub async fn partition(
    oracle: &dyn HelperContract,
    chunk: &[SummonerId],
) -> Result<EligibilityPartition> {
    let approved = oracle.is_approved(chunk).await.map_err(|e| match e {
        PlayError::EligibilityCheck(_) => e,
        other => PlayError::EligibilityCheck(other.to_string()),
    })?;

    let partition = EligibilityPartition::from_flags(chunk, &approved)?;
    debug!(
        eligible = partition.eligible.len(),
        needs_action = partition.needs_action.len(),
        "Eligibility partition computed"
    );
    Ok(partition)
}
