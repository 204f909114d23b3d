//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, the SQLite gateway and the service together.
//! - Print a deterministic summary of the configured habit store.

use habit_core::db::open_db;
use habit_core::{core_version, init_from_config, CoreConfig, HabitService, SqliteHabitGateway};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("habit_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::from_env()?;
    init_from_config(&config)?;

    let conn = open_db(&config.db_path)?;
    let service = HabitService::new(SqliteHabitGateway::new(&conn));
    let active = service.list_habits(false)?.len();
    let total = service.list_habits(true)?.len();
    log::info!("event=cli_summary module=cli status=ok active={active} total={total}");

    println!("habit_core version={}", core_version());
    println!("db_path={}", config.db_path.display());
    println!("habits active={active} total={total}");
    Ok(())
}
