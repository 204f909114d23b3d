//! Habit use-case service.
//!
//! # Responsibility
//! - Implement list/create/update/delete/restore/search/filter on top of a
//!   `HabitGateway`.
//! - Run pure validation before any storage call.
//! - Translate gateway and lifecycle failures into `HabitError`.
//!
//! # Invariants
//! - No two active habits share a name key, as far as read-then-write checks
//!   can see. The store's unique index catches what slips through a race.
//! - Every mutation stamps `updated_at` from the injected clock, moved one
//!   past the stored value when the clock lags the row.
//! - Failures are returned as values; the service never retries.

use crate::clock::{Clock, SystemClock};
use crate::model::habit::{name_key, Habit, HabitId, NewHabit};
use crate::model::lifecycle::{ensure_updatable, Transition, TransitionError};
use crate::model::patch::HabitPatch;
use crate::repo::habit_repo::{GatewayError, HabitGateway};
use crate::service::update_composer::{NoFieldsToUpdate, UpdateComposer};
use crate::validation::name::is_valid_name;
use crate::validation::progress::{normalize_progress, normalize_progress_filter, InvalidProgress};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type HabitResult<T> = Result<T, HabitError>;

/// Typed failure returned by every service operation.
#[derive(Debug)]
pub enum HabitError {
    /// Name missing, blank, with disallowed characters, or under 3 letters.
    InvalidName,
    /// Progress missing or outside the canonical enumeration.
    InvalidProgress(InvalidProgress),
    /// Id missing, non-numeric, or not positive. Carries the raw input.
    InvalidId(String),
    /// Id does not resolve to a record in the required state.
    NotFound(HabitId),
    /// Restore attempted on an active habit.
    NotDeleted(HabitId),
    /// Another active habit already holds the name.
    DuplicateName,
    /// Update carried neither a name nor a progress value.
    NoFieldsToUpdate,
    /// Gateway failure, propagated without retry.
    StoreUnavailable(GatewayError),
    /// Write succeeded but read-back disagreed with it.
    InconsistentState(&'static str),
}

impl HabitError {
    /// Stable machine-readable kind for transport mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::InvalidProgress(_) => "invalid_progress",
            Self::InvalidId(_) => "invalid_id",
            Self::NotFound(_) => "not_found",
            Self::NotDeleted(_) => "not_deleted",
            Self::DuplicateName => "duplicate_name",
            Self::NoFieldsToUpdate => "no_fields_to_update",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }

    /// Whether the failure came from storage rather than caller input.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::InconsistentState(_))
    }
}

impl Display for HabitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(
                f,
                "habit name is required, needs at least 3 letters and only letters or spaces"
            ),
            Self::InvalidProgress(err) => write!(f, "{err}"),
            Self::InvalidId(raw) => write!(f, "invalid habit id: `{raw}`"),
            Self::NotFound(id) => write!(f, "habit not found: {id}"),
            Self::NotDeleted(id) => write!(f, "habit {id} was never deleted"),
            Self::DuplicateName => write!(f, "an active habit with that name already exists"),
            Self::NoFieldsToUpdate => write!(f, "no fields supplied for update"),
            Self::StoreUnavailable(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent habit state: {details}"),
        }
    }
}

impl Error for HabitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidProgress(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for HabitError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::UniqueViolation => Self::DuplicateName,
            other => Self::StoreUnavailable(other),
        }
    }
}

impl From<TransitionError> for HabitError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::NotFound(id) => Self::NotFound(id),
            TransitionError::NotDeleted(id) => Self::NotDeleted(id),
        }
    }
}

impl From<InvalidProgress> for HabitError {
    fn from(value: InvalidProgress) -> Self {
        Self::InvalidProgress(value)
    }
}

impl From<NoFieldsToUpdate> for HabitError {
    fn from(_: NoFieldsToUpdate) -> Self {
        Self::NoFieldsToUpdate
    }
}

/// Result of the list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitListing {
    /// Habits ordered by `created_at` descending.
    Found(Vec<Habit>),
    /// Nothing matched; a legitimate outcome rather than a failure.
    NoHabits,
}

impl HabitListing {
    fn from_rows(habits: Vec<Habit>) -> Self {
        if habits.is_empty() {
            Self::NoHabits
        } else {
            Self::Found(habits)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Found(habits) => habits.len(),
            Self::NoHabits => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoHabits)
    }

    pub fn into_habits(self) -> Vec<Habit> {
        match self {
            Self::Found(habits) => habits,
            Self::NoHabits => Vec::new(),
        }
    }
}

/// Habit service facade over a persistence gateway.
pub struct HabitService<G: HabitGateway, C: Clock = SystemClock> {
    gateway: G,
    clock: C,
}

impl<G: HabitGateway> HabitService<G> {
    /// Creates a service stamping mutations with the system clock.
    pub fn new(gateway: G) -> Self {
        Self::with_clock(gateway, SystemClock::new())
    }
}

impl<G: HabitGateway, C: Clock> HabitService<G, C> {
    pub fn with_clock(gateway: G, clock: C) -> Self {
        Self { gateway, clock }
    }

    /// Lists habits, newest first. Deleted ones only with `include_deleted`.
    pub fn list_habits(&self, include_deleted: bool) -> HabitResult<HabitListing> {
        let started_at = Instant::now();
        let result = self
            .gateway
            .query_all(include_deleted)
            .map(HabitListing::from_rows)
            .map_err(HabitError::from);
        if let Ok(listing) = &result {
            debug!(
                "event=habit_list module=service include_deleted={} count={}",
                include_deleted,
                listing.len()
            );
        }
        finish("habit_list", started_at, result)
    }

    /// Creates an active habit with default progress.
    pub fn create_habit(&self, name: &str) -> HabitResult<Habit> {
        let started_at = Instant::now();
        let result = self.create_inner(name);
        finish("habit_create", started_at, result)
    }

    /// Updates name and/or progress of an active habit.
    ///
    /// Empty strings count as not supplied. Returns the row re-read after
    /// the write.
    pub fn update_habit(
        &self,
        id: HabitId,
        name: Option<&str>,
        progress: Option<&str>,
    ) -> HabitResult<Habit> {
        let started_at = Instant::now();
        let result = self.update_inner(id, name, progress);
        finish("habit_update", started_at, result)
    }

    /// Soft-deletes an active habit.
    ///
    /// Deleting an already-deleted habit reports `NotFound`.
    pub fn delete_habit(&self, id: HabitId) -> HabitResult<Habit> {
        let started_at = Instant::now();
        let result = self.transition(Transition::Delete, id);
        finish("habit_delete", started_at, result)
    }

    /// Restores a soft-deleted habit.
    pub fn restore_habit(&self, id: HabitId) -> HabitResult<Habit> {
        let started_at = Instant::now();
        let result = self.transition(Transition::Restore, id);
        finish("habit_restore", started_at, result)
    }

    /// Active habits whose normalized name equals `name`'s. May be empty.
    pub fn search_by_name(&self, name: &str) -> HabitResult<Vec<Habit>> {
        let started_at = Instant::now();
        let result = if is_valid_name(Some(name)) {
            self.gateway
                .find_by_name(&name_key(name))
                .map_err(HabitError::from)
        } else {
            Err(HabitError::InvalidName)
        };
        finish("habit_search", started_at, result)
    }

    /// Active habits in the given progress state. May be empty.
    pub fn filter_by_progress(&self, progress: &str) -> HabitResult<Vec<Habit>> {
        let started_at = Instant::now();
        let result = normalize_progress_filter(Some(progress))
            .map_err(HabitError::from)
            .and_then(|progress| {
                self.gateway
                    .find_by_progress(progress)
                    .map_err(HabitError::from)
            });
        finish("habit_filter", started_at, result)
    }

    fn create_inner(&self, name: &str) -> HabitResult<Habit> {
        if !is_valid_name(Some(name)) {
            return Err(HabitError::InvalidName);
        }
        self.ensure_name_available(&name_key(name), None)?;

        let habit = NewHabit::active(name, self.clock.now_ms());
        let id = self.gateway.insert(&habit)?;
        debug!("event=habit_create module=service id={id}");
        Ok(habit.into_habit(id))
    }

    fn update_inner(
        &self,
        id: HabitId,
        name: Option<&str>,
        progress: Option<&str>,
    ) -> HabitResult<Habit> {
        let id = ensure_valid_id(id)?;

        let name = name.filter(|value| !value.is_empty());
        if name.is_some() && !is_valid_name(name) {
            return Err(HabitError::InvalidName);
        }
        let progress = match progress.filter(|value| !value.is_empty()) {
            Some(value) => Some(normalize_progress(Some(value))?),
            None => None,
        };
        let now = self.clock.now_ms();
        let mut patch = UpdateComposer::new(id)
            .name(name)
            .progress(progress)
            .finish(now)?;

        let current = self.gateway.find_by_id(id)?;
        let habit = ensure_updatable(id, current.as_ref())?;
        patch.stamp(habit.next_updated_at(now));
        if let Some(new_name) = patch.name() {
            self.ensure_name_available(&name_key(new_name), Some(id))?;
        }

        self.apply(&patch)
    }

    fn transition(&self, transition: Transition, id: HabitId) -> HabitResult<Habit> {
        let id = ensure_valid_id(id)?;
        let current = self.gateway.find_by_id(id)?;
        let patch = transition.plan(id, current.as_ref(), self.clock.now_ms())?;

        if let (Transition::Restore, Some(habit)) = (transition, current.as_ref()) {
            self.ensure_name_available(&habit.name_key(), Some(id))?;
        }

        self.apply(&patch)
    }

    fn ensure_name_available(&self, key: &str, except: Option<HabitId>) -> HabitResult<()> {
        let holders = self.gateway.find_by_name(key)?;
        if holders.iter().any(|habit| Some(habit.id) != except) {
            return Err(HabitError::DuplicateName);
        }
        Ok(())
    }

    fn apply(&self, patch: &HabitPatch) -> HabitResult<Habit> {
        let changed = self.gateway.update(patch)?;
        if changed == 0 {
            return Err(HabitError::NotFound(patch.id));
        }

        self.gateway
            .find_by_id(patch.id)?
            .ok_or(HabitError::InconsistentState(
                "updated habit not found in read-back",
            ))
    }
}

fn ensure_valid_id(id: HabitId) -> HabitResult<HabitId> {
    if id <= 0 {
        return Err(HabitError::InvalidId(id.to_string()));
    }
    Ok(id)
}

fn finish<T>(event: &'static str, started_at: Instant, result: HabitResult<T>) -> HabitResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(err) if err.is_store_failure() => error!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
    result
}
