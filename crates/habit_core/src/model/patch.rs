//! Typed partial-write intents.
//!
//! # Responsibility
//! - Describe which habit columns a write assigns, in a fixed order.
//! - Keep query text out of the service layer.
//!
//! # Invariants
//! - A patch always targets exactly one habit id.
//! - `changes` is never empty once built through a composer or transition.

use crate::model::habit::{HabitId, Progress};

/// One column assignment inside a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Name(String),
    Progress(Progress),
    Deleted(bool),
    UpdatedAt(i64),
}

impl FieldChange {
    /// Column name as persisted.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Progress(_) => "progress",
            Self::Deleted(_) => "deleted",
            Self::UpdatedAt(_) => "updated_at",
        }
    }
}

/// Ordered set of assignments plus the id predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitPatch {
    pub id: HabitId,
    pub changes: Vec<FieldChange>,
}

impl HabitPatch {
    pub fn new(id: HabitId) -> Self {
        Self {
            id,
            changes: Vec::new(),
        }
    }

    pub fn push(&mut self, change: FieldChange) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Replaces the `updated_at` assignment, adding one if missing.
    pub fn stamp(&mut self, at: i64) {
        match self
            .changes
            .iter_mut()
            .find(|change| matches!(change, FieldChange::UpdatedAt(_)))
        {
            Some(change) => *change = FieldChange::UpdatedAt(at),
            None => self.changes.push(FieldChange::UpdatedAt(at)),
        }
    }

    /// Assigned name, when the patch renames the habit.
    pub fn name(&self) -> Option<&str> {
        self.changes.iter().find_map(|change| match change {
            FieldChange::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Columns in write order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.changes.iter().map(FieldChange::column).collect()
    }
}
