//! Ordered, duplicate-free summoner collections

use super::summoner::{Activity, Summoner, SummonerId};
use crate::utils::error::{PlayError, Result};
use std::collections::HashSet;

/// Summoners owned by one account, in fetch order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    summoners: Vec<Summoner>,
}

impl Roster {
    /// Build a roster, rejecting duplicate ids
    pub fn new(summoners: Vec<Summoner>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(summoners.len());
        for summoner in &summoners {
            if !seen.insert(&summoner.id) {
                return Err(PlayError::Validation(format!(
                    "Duplicate summoner id: {}",
                    summoner.id
                )));
            }
        }
        Ok(Self { summoners })
    }

    pub fn len(&self) -> usize {
        self.summoners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summoners.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Summoner> {
        self.summoners.iter()
    }

    pub fn first(&self) -> Option<&Summoner> {
        self.summoners.first()
    }

    pub fn get(&self, index: usize) -> Option<&Summoner> {
        self.summoners.get(index)
    }

    pub fn position(&self, id: &SummonerId) -> Option<usize> {
        self.summoners.iter().position(|s| &s.id == id)
    }

    pub fn find(&self, id: &SummonerId) -> Option<&Summoner> {
        self.summoners.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SummonerId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<SummonerId> {
        self.summoners.iter().map(|s| s.id.clone()).collect()
    }

    /// Ids of the summoners that can take part in `activity` at `now`, in roster order
    pub fn candidates(&self, activity: Activity, now: u64) -> Vec<SummonerId> {
        self.summoners
            .iter()
            .filter(|s| s.is_candidate(activity, now))
            .map(|s| s.id.clone())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Summoner;
    type IntoIter = std::slice::Iter<'a, Summoner>;

    fn into_iter(self) -> Self::IntoIter {
        self.summoners.iter()
    }
}
