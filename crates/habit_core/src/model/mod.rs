//! Habit domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the active/deleted lifecycle rules and typed write intents.
//!
//! # Invariants
//! - Every habit is identified by a persistence-assigned positive id.
//! - Deletion is represented by soft-delete tombstones, not hard delete.

pub mod habit;
pub mod lifecycle;
pub mod patch;
