//! Progress text canonicalization.
//!
//! # Invariants
//! - Normalization of an already canonical value returns the same value.
//! - Only the three `Progress` values ever leave this module.

use crate::model::habit::Progress;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Progress input is missing or outside the canonical enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidProgress {
    /// Input after whitespace/case normalization, when any was supplied.
    pub normalized: Option<String>,
}

impl InvalidProgress {
    /// Canonical values accepted by the normalizer.
    pub fn allowed() -> Vec<&'static str> {
        Progress::ALL.iter().map(|progress| progress.as_str()).collect()
    }
}

impl Display for InvalidProgress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid progress, must be one of: {}", Self::allowed().join(", "))
    }
}

impl Error for InvalidProgress {}

/// Canonicalizes user progress text into a `Progress` value.
///
/// Trims, collapses whitespace runs, lower-cases, then capitalizes the first
/// letter of each word before matching the canonical display form.
pub fn normalize_progress(input: Option<&str>) -> Result<Progress, InvalidProgress> {
    let raw = input.ok_or(InvalidProgress { normalized: None })?;
    let normalized = title_case(&collapse_lower(raw));
    Progress::from_canonical(&normalized).ok_or(InvalidProgress {
        normalized: Some(normalized),
    })
}

/// Lower-case-only variant used by progress filtering.
pub fn normalize_progress_filter(input: Option<&str>) -> Result<Progress, InvalidProgress> {
    let raw = input.ok_or(InvalidProgress { normalized: None })?;
    let normalized = collapse_lower(raw);
    Progress::ALL
        .into_iter()
        .find(|progress| progress.as_str().to_lowercase() == normalized)
        .ok_or(InvalidProgress {
            normalized: Some(normalized),
        })
}

fn collapse_lower(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
