//! Habit name validation.

use once_cell::sync::Lazy;
use regex::Regex;

const MIN_NAME_LETTERS: usize = 3;

static ALLOWED_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZáéíóúüñÁÉÍÓÚÜÑ\s]+$").expect("valid name regex"));
static NAME_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-ZáéíóúüñÁÉÍÓÚÜÑ]").expect("valid letter regex"));

/// Returns whether `input` is an acceptable habit name.
///
/// Accepts letters (including Spanish diacritics) and whitespace only, with
/// at least three letters in total. Absent or blank input is rejected.
pub fn is_valid_name(input: Option<&str>) -> bool {
    let Some(raw) = input else {
        return false;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() || !ALLOWED_NAME_RE.is_match(trimmed) {
        return false;
    }

    NAME_LETTER_RE.find_iter(trimmed).count() >= MIN_NAME_LETTERS
}
