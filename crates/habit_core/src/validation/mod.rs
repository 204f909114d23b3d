//! Input validation for habit fields.
//!
//! # Responsibility
//! - Decide whether candidate names are well-formed.
//! - Canonicalize progress text into the fixed `Progress` enumeration.
//!
//! # Invariants
//! - Validators are pure and never touch persistence.

pub mod name;
pub mod progress;
