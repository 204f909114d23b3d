//! Core domain logic for habit tracking.
//! This crate is the single source of truth for habit invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod request;
pub mod service;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::habit::{name_key, Habit, HabitId, HabitState, NewHabit, Progress};
pub use model::lifecycle::{Transition, TransitionError};
pub use model::patch::{FieldChange, HabitPatch};
pub use repo::habit_repo::{GatewayError, GatewayResult, HabitGateway, SqliteHabitGateway};
pub use request::{parse_habit_id, parse_include_deleted, CreateHabitRequest, UpdateHabitRequest};
pub use service::habit_service::{HabitError, HabitListing, HabitResult, HabitService};
pub use service::update_composer::{compose_update, NoFieldsToUpdate, UpdateComposer};
pub use validation::name::is_valid_name;
pub use validation::progress::{normalize_progress, normalize_progress_filter, InvalidProgress};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
