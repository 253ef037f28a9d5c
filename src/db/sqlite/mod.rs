//! SQLite database module

pub mod models;
mod migrations;
mod readings;

use crate::error::Result;
use models::Reading;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
///
/// Single-process, single-writer. The connection sits behind a mutex; callers
/// do read-modify-write under that single ownership, no further locking.
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Create new SQLite database connection
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };

        db.run_migrations()?;

        Ok(db)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Series Store Methods ==========

    /// Append readings (append-only, no deduplication)
    pub fn append_readings(&self, readings: &[Reading]) -> Result<usize> {
        let conn = self.conn.lock();
        readings::append_readings(&conn, readings)
    }

    /// Load all readings ascending by timestamp
    pub fn load_readings(&self) -> Result<Vec<Reading>> {
        let conn = self.conn.lock();
        readings::load_readings(&conn)
    }

    /// Count stored readings
    pub fn count_readings(&self) -> Result<i64> {
        let conn = self.conn.lock();
        readings::count_readings(&conn)
    }

    /// Rewrite the series table with a cleaned set of readings (maintenance)
    pub fn replace_readings(&self, cleaned: &[Reading]) -> Result<usize> {
        let mut conn = self.conn.lock();
        readings::replace_readings(&mut conn, cleaned)
    }
}
