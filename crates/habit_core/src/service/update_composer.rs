//! Partial-update composition.
//!
//! # Invariants
//! - Field order is always name, progress, updated_at, whatever order the
//!   builder methods were called in.
//! - `updated_at` is only stamped when at least one real field changes.

use crate::model::habit::{HabitId, Progress};
use crate::model::patch::{FieldChange, HabitPatch};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Neither a name nor a progress value was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoFieldsToUpdate;

impl Display for NoFieldsToUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "no fields supplied for update")
    }
}

impl Error for NoFieldsToUpdate {}

/// Builder for the minimal write of a habit update.
///
/// Inputs are expected to be validated already: names by
/// `validation::name::is_valid_name`, progress by the normalizer.
#[derive(Debug, Clone)]
pub struct UpdateComposer {
    id: HabitId,
    name: Option<String>,
    progress: Option<Progress>,
}

impl UpdateComposer {
    pub fn new(id: HabitId) -> Self {
        Self {
            id,
            name: None,
            progress: None,
        }
    }

    /// Sets the new name. Empty input counts as not supplied.
    pub fn name(mut self, name: Option<&str>) -> Self {
        self.name = name
            .filter(|value| !value.is_empty())
            .map(|value| value.trim().to_string());
        self
    }

    pub fn progress(mut self, progress: Option<Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Builds the patch, stamping `updated_at = now`.
    pub fn finish(self, now: i64) -> Result<HabitPatch, NoFieldsToUpdate> {
        if self.name.is_none() && self.progress.is_none() {
            return Err(NoFieldsToUpdate);
        }

        let mut patch = HabitPatch::new(self.id);
        if let Some(name) = self.name {
            patch.push(FieldChange::Name(name));
        }
        if let Some(progress) = self.progress {
            patch.push(FieldChange::Progress(progress));
        }
        patch.push(FieldChange::UpdatedAt(now));
        Ok(patch)
    }
}

/// One-shot form of `UpdateComposer`.
pub fn compose_update(
    id: HabitId,
    name: Option<&str>,
    progress: Option<Progress>,
    now: i64,
) -> Result<HabitPatch, NoFieldsToUpdate> {
    UpdateComposer::new(id).name(name).progress(progress).finish(now)
}

#[cfg(test)]
mod tests {
    use super::{compose_update, NoFieldsToUpdate, UpdateComposer};
    use crate::model::habit::Progress;
    use crate::model::patch::FieldChange;

    #[test]
    fn composes_fields_in_fixed_order() {
        let patch = UpdateComposer::new(3)
            .progress(Some(Progress::Completed))
            .name(Some(" Correr "))
            .finish(500)
            .unwrap();

        assert_eq!(patch.id, 3);
        assert_eq!(
            patch.changes,
            vec![
                FieldChange::Name("Correr".to_string()),
                FieldChange::Progress(Progress::Completed),
                FieldChange::UpdatedAt(500),
            ]
        );
        assert_eq!(patch.columns(), vec!["name", "progress", "updated_at"]);
    }

    #[test]
    fn single_field_still_stamps_updated_at() {
        let patch = compose_update(1, None, Some(Progress::Disabled), 9).unwrap();
        assert_eq!(patch.columns(), vec!["progress", "updated_at"]);

        let patch = compose_update(1, Some("Nadar"), None, 9).unwrap();
        assert_eq!(patch.columns(), vec!["name", "updated_at"]);
    }

    #[test]
    fn nothing_supplied_is_rejected() {
        assert_eq!(compose_update(1, None, None, 9), Err(NoFieldsToUpdate));
        assert_eq!(compose_update(1, Some(""), None, 9), Err(NoFieldsToUpdate));
    }
}
