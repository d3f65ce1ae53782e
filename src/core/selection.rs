//! Selected summoner, detail view and open modal

use crate::core::models::{Roster, Summoner, SummonerId};
use crate::utils::error::{PlayError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Detail panel shown for the selected summoner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Stats,
    Adventure,
    Skills,
    Inventory,
    Crafting,
}

/// At most one modal is open at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modal {
    #[default]
    None,
    Delete,
    Transfer,
    Daycare,
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }
}

/// Tracks which summoner is selected over the current roster
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    roster: Arc<Roster>,
    selected: Option<SummonerId>,
    view: View,
    modal: Modal,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn selected_id(&self) -> Option<&SummonerId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Summoner> {
        self.selected.as_ref().and_then(|id| self.roster.find(id))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.as_ref().and_then(|id| self.roster.position(id))
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn modal(&self) -> Modal {
        self.modal
    }

    /// Replace the roster, keeping the selection if it is still a member
    pub fn set_collection(&mut self, roster: Arc<Roster>) {
        let keep = self
            .selected
            .as_ref()
            .is_some_and(|id| roster.contains(id));
        if !keep {
            self.selected = roster.first().map(|s| s.id.clone());
        }
        self.roster = roster;
    }

    /// Move to the next summoner; no-op at the end or without a selection
    pub fn select_next(&mut self) {
        if let Some(index) = self.selected_index() {
            if let Some(next) = self.roster.get(index + 1) {
                self.selected = Some(next.id.clone());
            }
        }
    }

    /// Move to the previous summoner; no-op at the start or without a selection
    pub fn select_previous(&mut self) {
        if let Some(index) = self.selected_index() {
            if index > 0 {
                if let Some(prev) = self.roster.get(index - 1) {
                    self.selected = Some(prev.id.clone());
                }
            }
        }
    }

    pub fn select_explicit(&mut self, id: &SummonerId) -> Result<()> {
        if !self.roster.contains(id) {
            return Err(PlayError::NotFound(format!("Summoner {} is not in the roster", id)));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Open `modal`, or close it when it is already the open one
    pub fn toggle_modal(&mut self, modal: Modal) {
        self.modal = if self.modal == modal {
            Modal::None
        } else {
            modal
        };
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
    }
}
