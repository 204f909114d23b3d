//! Habit persistence gateway contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the read/write intents the service issues against storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Name and progress lookups only ever return active rows.
//! - Every name write also refreshes `name_key`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::habit::{name_key, Habit, HabitId, NewHabit, Progress};
use crate::model::patch::{FieldChange, HabitPatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const HABIT_SELECT_SQL: &str = "SELECT
    id,
    name,
    progress,
    created_at,
    updated_at,
    deleted
FROM habits";

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure raised while talking to the habit store.
#[derive(Debug)]
pub enum GatewayError {
    /// Driver/connection level failure.
    Unavailable(DbError),
    /// The store's active-name unique index rejected the write.
    UniqueViolation,
    /// A persisted row could not be decoded, or a write intent was malformed.
    InvalidData(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "habit store unavailable: {err}"),
            Self::UniqueViolation => write!(f, "active habit name already stored"),
            Self::InvalidData(message) => write!(f, "invalid habit data: {message}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, _) = &value {
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
                return Self::UniqueViolation;
            }
        }
        Self::Unavailable(DbError::Sqlite(value))
    }
}

/// Storage boundary consumed by `HabitService`.
pub trait HabitGateway {
    /// All habits ordered by `created_at DESC, id DESC`.
    fn query_all(&self, include_deleted: bool) -> GatewayResult<Vec<Habit>>;
    /// One habit by id, whatever its lifecycle state.
    fn find_by_id(&self, id: HabitId) -> GatewayResult<Option<Habit>>;
    /// Active habits whose name key equals `key`.
    fn find_by_name(&self, key: &str) -> GatewayResult<Vec<Habit>>;
    /// Active habits with the given progress.
    fn find_by_progress(&self, progress: Progress) -> GatewayResult<Vec<Habit>>;
    /// Inserts one habit and returns the generated id.
    fn insert(&self, habit: &NewHabit) -> GatewayResult<HabitId>;
    /// Applies a patch and returns the number of affected rows.
    fn update(&self, patch: &HabitPatch) -> GatewayResult<usize>;
}

impl<G: HabitGateway + ?Sized> HabitGateway for &G {
    fn query_all(&self, include_deleted: bool) -> GatewayResult<Vec<Habit>> {
        (**self).query_all(include_deleted)
    }

    fn find_by_id(&self, id: HabitId) -> GatewayResult<Option<Habit>> {
        (**self).find_by_id(id)
    }

    fn find_by_name(&self, key: &str) -> GatewayResult<Vec<Habit>> {
        (**self).find_by_name(key)
    }

    fn find_by_progress(&self, progress: Progress) -> GatewayResult<Vec<Habit>> {
        (**self).find_by_progress(progress)
    }

    fn insert(&self, habit: &NewHabit) -> GatewayResult<HabitId> {
        (**self).insert(habit)
    }

    fn update(&self, patch: &HabitPatch) -> GatewayResult<usize> {
        (**self).update(patch)
    }
}

/// SQLite-backed habit gateway.
pub struct SqliteHabitGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitGateway<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_rows(&self, sql: &str, bind_values: Vec<Value>) -> GatewayResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut habits = Vec::new();

        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }

        Ok(habits)
    }
}

impl HabitGateway for SqliteHabitGateway<'_> {
    fn query_all(&self, include_deleted: bool) -> GatewayResult<Vec<Habit>> {
        let mut sql = HABIT_SELECT_SQL.to_string();
        if !include_deleted {
            sql.push_str(" WHERE deleted = 0");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC;");
        self.query_rows(&sql, Vec::new())
    }

    fn find_by_id(&self, id: HabitId) -> GatewayResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }

        Ok(None)
    }

    fn find_by_name(&self, key: &str) -> GatewayResult<Vec<Habit>> {
        self.query_rows(
            &format!(
                "{HABIT_SELECT_SQL}
                 WHERE name_key = ?1 AND deleted = 0
                 ORDER BY created_at DESC, id DESC;"
            ),
            vec![Value::Text(key.to_string())],
        )
    }

    fn find_by_progress(&self, progress: Progress) -> GatewayResult<Vec<Habit>> {
        self.query_rows(
            &format!(
                "{HABIT_SELECT_SQL}
                 WHERE progress = ?1 AND deleted = 0
                 ORDER BY created_at DESC, id DESC;"
            ),
            vec![Value::Text(progress.as_str().to_string())],
        )
    }

    fn insert(&self, habit: &NewHabit) -> GatewayResult<HabitId> {
        self.conn.execute(
            "INSERT INTO habits (
                name,
                name_key,
                progress,
                created_at,
                updated_at,
                deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                habit.name.as_str(),
                name_key(&habit.name),
                habit.progress.as_str(),
                habit.created_at,
                habit.updated_at,
                bool_to_int(habit.deleted),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, patch: &HabitPatch) -> GatewayResult<usize> {
        if patch.is_empty() {
            return Err(GatewayError::InvalidData(format!(
                "empty patch for habit {}",
                patch.id
            )));
        }

        let mut assignments = Vec::with_capacity(patch.changes.len() + 1);
        let mut bind_values: Vec<Value> = Vec::with_capacity(patch.changes.len() + 2);

        for change in &patch.changes {
            match change {
                FieldChange::Name(name) => {
                    assignments.push("name = ?");
                    bind_values.push(Value::Text(name.clone()));
                    assignments.push("name_key = ?");
                    bind_values.push(Value::Text(name_key(name)));
                }
                FieldChange::Progress(progress) => {
                    assignments.push("progress = ?");
                    bind_values.push(Value::Text(progress.as_str().to_string()));
                }
                FieldChange::Deleted(deleted) => {
                    assignments.push("deleted = ?");
                    bind_values.push(Value::Integer(bool_to_int(*deleted)));
                }
                FieldChange::UpdatedAt(updated_at) => {
                    assignments.push("updated_at = ?");
                    bind_values.push(Value::Integer(*updated_at));
                }
            }
        }
        bind_values.push(Value::Integer(patch.id));

        let sql = format!("UPDATE habits SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }
}

fn parse_habit_row(row: &Row<'_>) -> GatewayResult<Habit> {
    let id: HabitId = row.get("id")?;

    let progress_text: String = row.get("progress")?;
    let progress = Progress::from_canonical(&progress_text).ok_or_else(|| {
        GatewayError::InvalidData(format!(
            "invalid progress `{progress_text}` in habits.progress for id {id}"
        ))
    })?;

    let deleted = match row.get::<_, i64>("deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(GatewayError::InvalidData(format!(
                "invalid deleted value `{other}` in habits.deleted for id {id}"
            )));
        }
    };

    Ok(Habit {
        id,
        name: row.get("name")?,
        progress,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
