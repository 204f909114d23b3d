//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Resolve database path and logging settings with sane defaults.
//!
//! # Invariants
//! - Missing or blank variables fall back to defaults; only unparseable
//!   values are errors.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "HABITS_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "HABITS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "HABITS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "habits.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "habits-logs";
const KNOWN_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLogLevel(level) => write!(
                f,
                "{LOG_LEVEL_VAR}=`{level}` is not one of trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(dir) => write!(
                f,
                "{LOG_DIR_VAR}=`{}` must be an absolute path",
                dir.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) if KNOWN_LEVELS.contains(&level.to_ascii_lowercase().as_str()) => level,
            Some(level) => return Err(ConfigError::UnknownLogLevel(level)),
            None => default_log_level().to_string(),
        };

        let log_dir = match read(LOG_DIR_VAR).map(PathBuf::from) {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => return Err(ConfigError::RelativeLogDir(dir)),
            None => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}
