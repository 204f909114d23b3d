//! Persistence gateway abstractions and implementations.
//!
//! # Responsibility
//! - Define the read/write intents the core issues against storage.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Gateway APIs report uniqueness rejections separately from transport
//!   failures.

pub mod habit_repo;
