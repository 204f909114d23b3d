//! Transport-boundary input coercion.
//!
//! # Responsibility
//! - Turn loosely-typed request values (path segments, query strings, JSON
//!   bodies) into the typed scalars `HabitService` accepts.
//!
//! # Invariants
//! - Nothing untyped reaches the service; every id is checked here or in the
//!   service before storage is touched.

use crate::model::habit::HabitId;
use crate::service::habit_service::{HabitError, HabitResult};
use serde::Deserialize;

/// Body of a create request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateHabitRequest {
    pub name: Option<String>,
}

impl CreateHabitRequest {
    /// Name to hand to the service; a missing name becomes an empty one,
    /// which the name validator rejects.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Body of an update request. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub progress: Option<String>,
}

impl UpdateHabitRequest {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }
}

/// Parses a path/query id into a positive `HabitId`.
pub fn parse_habit_id(raw: Option<&str>) -> HabitResult<HabitId> {
    let text = raw.map(str::trim).unwrap_or_default();
    match text.parse::<HabitId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(HabitError::InvalidId(text.to_string())),
    }
}

/// Parses the `includeDeleted` query flag. Only the exact text `true`
/// enables it.
pub fn parse_include_deleted(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[cfg(test)]
mod tests {
    use super::{parse_habit_id, parse_include_deleted, CreateHabitRequest, UpdateHabitRequest};
    use crate::service::habit_service::HabitError;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!(parse_habit_id(Some("12")).unwrap(), 12);
        assert_eq!(parse_habit_id(Some(" 3 ")).unwrap(), 3);

        let rejected = [
            None,
            Some(""),
            Some("abc"),
            Some("0"),
            Some("-4"),
            Some("1.5"),
            Some("12abc"),
        ];
        for raw in rejected {
            let err = parse_habit_id(raw).unwrap_err();
            assert!(matches!(err, HabitError::InvalidId(_)), "{raw:?} should be invalid");
        }
    }

    #[test]
    fn include_deleted_needs_exact_true() {
        assert!(parse_include_deleted(Some("true")));
        assert!(!parse_include_deleted(Some("TRUE")));
        assert!(!parse_include_deleted(Some("1")));
        assert!(!parse_include_deleted(None));
    }

    #[test]
    fn request_bodies_accept_missing_fields() {
        let create: CreateHabitRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(create.name(), "");

        let update: UpdateHabitRequest =
            serde_json::from_str(r#"{"progress":"completado"}"#).unwrap();
        assert_eq!(update.name(), None);
        assert_eq!(update.progress(), Some("completado"));
    }

    #[test]
    fn non_string_progress_is_rejected_at_the_boundary() {
        let result = serde_json::from_str::<UpdateHabitRequest>(r#"{"progress":5}"#);
        assert!(result.is_err());
    }
}
