//! Cathode-DB: SQLite schema, migrations, and query operations.
//!
//! Two databases back the system: a read-only content **catalog** (one table
//! per content kind) and the **schedule** database holding the flattened,
//! denormalized rows the player reads. Each gets its own pool and its own
//! migration set.
//!
//! # Example
//!
//! ```no_run
//! use cathode_db::pool::{init_schedule_pool, get_conn};
//! use cathode_db::queries::schedule;
//!
//! let pool = init_schedule_pool("/var/lib/cathode/schedule.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//! let rows = schedule::rows_for_channel(&conn, 1).unwrap();
//! println!("{} rows scheduled", rows.len());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
