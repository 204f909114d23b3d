//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its progress enumeration.
//! - Provide the name key used for uniqueness and search comparisons.
//!
//! # Invariants
//! - `id` is assigned by persistence and never reused.
//! - `deleted` is the source of truth for tombstone state.
//! - `updated_at` is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Persistence-assigned habit identifier. Always positive once stored.
pub type HabitId = i64;

/// Canonical progress state of a habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Progress {
    #[default]
    #[serde(rename = "En Progreso")]
    InProgress,
    #[serde(rename = "Completado")]
    Completed,
    #[serde(rename = "Desactivado")]
    Disabled,
}

impl Progress {
    /// All canonical values in display order.
    pub const ALL: [Progress; 3] = [Progress::InProgress, Progress::Completed, Progress::Disabled];

    /// Canonical capitalized display form, as persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "En Progreso",
            Self::Completed => "Completado",
            Self::Disabled => "Desactivado",
        }
    }

    /// Parses the exact canonical form.
    pub fn from_canonical(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|progress| progress.as_str() == value)
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state derived from the `deleted` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitState {
    Active,
    Deleted,
}

/// Canonical habit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    /// Trimmed display name.
    pub name: String,
    pub progress: Progress,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed by every mutation.
    pub updated_at: i64,
    /// Soft delete tombstone.
    pub deleted: bool,
}

impl Habit {
    pub fn state(&self) -> HabitState {
        if self.deleted {
            HabitState::Deleted
        } else {
            HabitState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Normalized comparison key for this habit's name.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// Timestamp for the next write to this row: `now`, or one past the
    /// stored `updated_at` when the clock has not moved beyond it.
    pub fn next_updated_at(&self, now: i64) -> i64 {
        now.max(self.updated_at.saturating_add(1))
    }
}

/// Insert intent for a habit that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub progress: Progress,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted: bool,
}

impl NewHabit {
    /// Builds an active habit with default progress, stamped at `now`.
    pub fn active(name: &str, now: i64) -> Self {
        Self {
            name: name.trim().to_string(),
            progress: Progress::default(),
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// Attaches the id generated by persistence.
    pub fn into_habit(self, id: HabitId) -> Habit {
        Habit {
            id,
            name: self.name,
            progress: self.progress,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted: self.deleted,
        }
    }
}

/// Returns the name comparison key: trimmed, whitespace runs collapsed,
/// lower-cased.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{name_key, NewHabit, Progress};

    #[test]
    fn next_updated_at_never_repeats_or_goes_back() {
        let habit = NewHabit::active("Leer", 1_000).into_habit(1);
        assert_eq!(habit.next_updated_at(1_500), 1_500);
        assert_eq!(habit.next_updated_at(1_000), 1_001);
        assert_eq!(habit.next_updated_at(400), 1_001);
    }

    #[test]
    fn name_key_collapses_whitespace_and_folds_case() {
        assert_eq!(name_key("  Leer   Libros "), "leer libros");
        assert_eq!(name_key("CAMINAR ÁGIL"), "caminar ágil");
    }

    #[test]
    fn progress_round_trips_canonical_text() {
        for progress in Progress::ALL {
            assert_eq!(Progress::from_canonical(progress.as_str()), Some(progress));
        }
        assert_eq!(Progress::from_canonical("completado"), None);
    }

    #[test]
    fn new_habit_defaults_to_active_in_progress() {
        let habit = NewHabit::active("  Leer ", 42);
        assert_eq!(habit.name, "Leer");
        assert_eq!(habit.progress, Progress::InProgress);
        assert_eq!(habit.created_at, habit.updated_at);
        assert!(!habit.deleted);
    }
}
