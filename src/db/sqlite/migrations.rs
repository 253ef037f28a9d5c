//! SQLite database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create migrations table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_ghg_data", CREATE_GHG_DATA_TABLE)?;

    tracing::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    // Check if migration already applied
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

// Append-only series table. No UNIQUE constraint on timestamp: ingestion may
// insert overlapping hours; the maintenance merge/clean step resolves
// duplicates before analytic use.
const CREATE_GHG_DATA_TABLE: &str = r#"
CREATE TABLE ghg_data (
    timestamp TEXT NOT NULL,
    pm10 REAL,
    pm2_5 REAL,
    co REAL,
    no2 REAL,
    so2 REAL,
    o3 REAL,
    temp REAL,
    humidity REAL,
    wind_speed REAL
);
CREATE INDEX IF NOT EXISTS idx_ghg_data_timestamp ON ghg_data(timestamp);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        // Table exists and is empty
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM ghg_data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }
}
