//! Database migrations.
//!
//! Migrations are embedded in the binary and executed in order, tracked in a
//! `schema_migrations` ledger table. The catalog and schedule databases each
//! carry their own migration set.

use rusqlite::{Connection, Result};
use thiserror::Error;

/// Migration error types.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {0} failed: {1}")]
    Failed(usize, String),
}

/// A single migration with its SQL content.
struct Migration {
    version: usize,
    name: &'static str,
    sql: &'static str,
}

const CATALOG_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "catalog_tables",
    sql: include_str!("001_catalog.sql"),
}];

const SCHEDULE_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "schedule_table",
    sql: include_str!("001_schedule.sql"),
}];

/// Initialize the migrations table if it doesn't exist.
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version.
fn get_current_version(conn: &Connection) -> Result<usize> {
    match conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<usize>>(0)
    }) {
        Ok(Some(version)) => Ok(version),
        Ok(None) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Apply a single migration.
fn apply_migration(conn: &Connection, migration: &Migration) -> Result<(), MigrationError> {
    conn.execute_batch(migration.sql)
        .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?, ?)",
        rusqlite::params![migration.version, migration.name],
    )
    .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    Ok(())
}

fn run(conn: &Connection, migrations: &[Migration]) -> Result<(), MigrationError> {
    init_migrations_table(conn)?;
    let current = get_current_version(conn)?;

    for migration in migrations.iter().filter(|m| m.version > current) {
        tracing::debug!(
            version = migration.version,
            name = migration.name,
            "applying migration"
        );
        apply_migration(conn, migration)?;
    }

    Ok(())
}

/// Run all pending catalog migrations.
pub fn run_catalog_migrations(conn: &Connection) -> Result<(), MigrationError> {
    run(conn, CATALOG_MIGRATIONS)
}

/// Run all pending schedule migrations.
pub fn run_schedule_migrations(conn: &Connection) -> Result<(), MigrationError> {
    run(conn, SCHEDULE_MIGRATIONS)
}
