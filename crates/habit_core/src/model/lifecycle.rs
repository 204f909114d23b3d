//! Active/deleted lifecycle rules.
//!
//! # Responsibility
//! - Decide whether delete, restore, or update may proceed for a looked-up row.
//! - Produce the flag-flip patch for a permitted transition.
//!
//! # Invariants
//! - An unresolved id is always `NotFound`, checked before any state rule.
//! - Delete treats an already-deleted row as `NotFound`.
//! - Deletion never removes a row; it only flips `deleted`.
//! - A planned `updated_at` is strictly greater than the row's current one.

use crate::model::habit::{Habit, HabitId, HabitState};
use crate::model::patch::{FieldChange, HabitPatch};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Id does not resolve, or resolves to a row outside the allowed state.
    NotFound(HabitId),
    /// Restore attempted on a row that is already active.
    NotDeleted(HabitId),
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "habit not found: {id}"),
            Self::NotDeleted(id) => write!(f, "habit {id} was never deleted"),
        }
    }
}

impl Error for TransitionError {}

/// State-changing lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Delete,
    Restore,
}

impl Transition {
    pub fn source(self) -> HabitState {
        match self {
            Self::Delete => HabitState::Active,
            Self::Restore => HabitState::Deleted,
        }
    }

    pub fn target(self) -> HabitState {
        match self {
            Self::Delete => HabitState::Deleted,
            Self::Restore => HabitState::Active,
        }
    }

    /// Checks `current` against this transition and builds its patch.
    ///
    /// The patch is stamped with `now`, clamped past the row's `updated_at`.
    pub fn plan(
        self,
        id: HabitId,
        current: Option<&Habit>,
        now: i64,
    ) -> Result<HabitPatch, TransitionError> {
        let habit = current.ok_or(TransitionError::NotFound(id))?;
        if habit.state() != self.source() {
            return Err(match self {
                Self::Delete => TransitionError::NotFound(id),
                Self::Restore => TransitionError::NotDeleted(id),
            });
        }

        let mut patch = HabitPatch::new(id);
        patch.push(FieldChange::Deleted(self.target() == HabitState::Deleted));
        patch.push(FieldChange::UpdatedAt(habit.next_updated_at(now)));
        Ok(patch)
    }
}

/// Returns the row when it may receive a field update (active only).
pub fn ensure_updatable(id: HabitId, current: Option<&Habit>) -> Result<&Habit, TransitionError> {
    match current {
        Some(habit) if habit.is_active() => Ok(habit),
        _ => Err(TransitionError::NotFound(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_updatable, Transition, TransitionError};
    use crate::model::habit::{Habit, Progress};
    use crate::model::patch::FieldChange;

    fn habit(deleted: bool) -> Habit {
        Habit {
            id: 7,
            name: "Leer".to_string(),
            progress: Progress::InProgress,
            created_at: 100,
            updated_at: 100,
            deleted,
        }
    }

    #[test]
    fn delete_active_flips_flag_and_stamps_time() {
        let patch = Transition::Delete.plan(7, Some(&habit(false)), 200).unwrap();
        assert_eq!(
            patch.changes,
            vec![FieldChange::Deleted(true), FieldChange::UpdatedAt(200)]
        );
    }

    #[test]
    fn delete_already_deleted_is_not_found() {
        let err = Transition::Delete.plan(7, Some(&habit(true)), 200).unwrap_err();
        assert_eq!(err, TransitionError::NotFound(7));
    }

    #[test]
    fn restore_requires_deleted_state() {
        let err = Transition::Restore.plan(7, Some(&habit(false)), 200).unwrap_err();
        assert_eq!(err, TransitionError::NotDeleted(7));

        let patch = Transition::Restore.plan(7, Some(&habit(true)), 200).unwrap();
        assert_eq!(patch.changes[0], FieldChange::Deleted(false));
    }

    #[test]
    fn lagging_clock_still_moves_updated_at_forward() {
        let patch = Transition::Delete.plan(7, Some(&habit(false)), 100).unwrap();
        assert_eq!(patch.changes[1], FieldChange::UpdatedAt(101));

        let patch = Transition::Restore.plan(7, Some(&habit(true)), 40).unwrap();
        assert_eq!(patch.changes[1], FieldChange::UpdatedAt(101));
    }

    #[test]
    fn unknown_id_is_not_found_for_every_transition() {
        for transition in [Transition::Delete, Transition::Restore] {
            assert_eq!(
                transition.plan(9, None, 1).unwrap_err(),
                TransitionError::NotFound(9)
            );
        }
        assert_eq!(ensure_updatable(9, None).unwrap_err(), TransitionError::NotFound(9));
    }

    #[test]
    fn update_rejects_deleted_rows() {
        let deleted = habit(true);
        assert_eq!(
            ensure_updatable(7, Some(&deleted)).unwrap_err(),
            TransitionError::NotFound(7)
        );
    }
}
