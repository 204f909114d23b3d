//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, lifecycle rules and gateway calls into
//!   use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod habit_service;
pub mod update_composer;
