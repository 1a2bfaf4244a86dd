use std::collections::HashSet;

use shared::domain::{DisplayRole, EntityId};

/// Which volumes have already been given a display role this session.
///
/// The two sets are disjoint and only ever grow, so a volume is assigned at
/// most once no matter how often its creation is announced.
#[derive(Debug, Default, Clone)]
pub struct AssignmentLedger {
    background: HashSet<EntityId>,
    foreground: HashSet<EntityId>,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// First volume ever seen becomes background, every later one foreground.
    /// Returns `Unassigned` for a volume already in the ledger.
    pub fn decide_volume_role(&mut self, entity_id: &EntityId) -> DisplayRole {
        if self.contains(entity_id) {
            return DisplayRole::Unassigned;
        }
        if self.background.is_empty() {
            self.background.insert(entity_id.clone());
            DisplayRole::Background
        } else {
            self.foreground.insert(entity_id.clone());
            DisplayRole::Foreground
        }
    }

    pub fn role_of(&self, entity_id: &EntityId) -> DisplayRole {
        if self.background.contains(entity_id) {
            DisplayRole::Background
        } else if self.foreground.contains(entity_id) {
            DisplayRole::Foreground
        } else {
            DisplayRole::Unassigned
        }
    }

    pub fn contains(&self, entity_id: &EntityId) -> bool {
        self.background.contains(entity_id) || self.foreground.contains(entity_id)
    }

    pub fn background(&self) -> Option<&EntityId> {
        self.background.iter().next()
    }

    pub fn assigned_background(&self) -> &HashSet<EntityId> {
        &self.background
    }

    pub fn assigned_foreground(&self) -> &HashSet<EntityId> {
        &self.foreground
    }

    pub fn len(&self) -> usize {
        self.background.len() + self.foreground.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "tests/ledger_tests.rs"]
mod tests;
