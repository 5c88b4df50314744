//! Database connection pool management.
//!
//! Connection pooling for SQLite using r2d2. Separate initializers exist for
//! the catalog and schedule databases since they carry different schemas;
//! in-memory variants back the test suites.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use cathode_common::{Error, Result};

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

fn build_pool(manager: SqliteConnectionManager, what: &str) -> Result<DbPool> {
    Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create {what} pool: {e}")))
}

fn file_manager(db_path: &str) -> SqliteConnectionManager {
    SqliteConnectionManager::file(db_path).with_init(|conn| {
        // WAL lets the playback loop read while a rebuild transaction is open
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
            .map(|_| ())
    })
}

/// Initialize the catalog database pool and run its migrations.
pub fn init_catalog_pool(db_path: &str) -> Result<DbPool> {
    let pool = build_pool(file_manager(db_path), "catalog")?;
    let conn = get_conn(&pool)?;
    migrations::run_catalog_migrations(&conn)
        .map_err(|e| Error::database(format!("Catalog migrations failed: {e}")))?;
    Ok(pool)
}

/// Initialize the schedule database pool and run its migrations.
pub fn init_schedule_pool(db_path: &str) -> Result<DbPool> {
    let pool = build_pool(file_manager(db_path), "schedule")?;
    let conn = get_conn(&pool)?;
    migrations::run_schedule_migrations(&conn)
        .map_err(|e| Error::database(format!("Schedule migrations failed: {e}")))?;
    Ok(pool)
}

/// In-memory catalog pool for testing.
///
/// Uses a single connection so every caller sees the same database.
pub fn init_memory_catalog_pool() -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(1)
        .build(SqliteConnectionManager::memory())
        .map_err(|e| Error::database(format!("Failed to create in-memory pool: {e}")))?;
    let conn = get_conn(&pool)?;
    migrations::run_catalog_migrations(&conn)
        .map_err(|e| Error::database(format!("Catalog migrations failed: {e}")))?;
    Ok(pool)
}

/// In-memory schedule pool for testing.
pub fn init_memory_schedule_pool() -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(1)
        .build(SqliteConnectionManager::memory())
        .map_err(|e| Error::database(format!("Failed to create in-memory pool: {e}")))?;
    let conn = get_conn(&pool)?;
    migrations::run_schedule_migrations(&conn)
        .map_err(|e| Error::database(format!("Schedule migrations failed: {e}")))?;
    Ok(pool)
}

/// Get a connection from the pool, mapping pool errors to our error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pools_initialize() {
        let catalog = init_memory_catalog_pool().unwrap();
        let schedule = init_memory_schedule_pool().unwrap();
        assert!(get_conn(&catalog).is_ok());
        assert!(get_conn(&schedule).is_ok());
    }

    #[test]
    fn test_file_pool_creates_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.db");
        let pool = init_schedule_pool(path.to_str().unwrap()).unwrap();
        drop(pool);
        assert!(path.exists());
    }
}
