//! `ghg_data` series table access
//!
//! The table is an append-only, timestamp-keyed log. Inserts never
//! deduplicate; `replace_readings` is the maintenance path that rewrites the
//! table with a cleaned series.

use crate::db::sqlite::models::{Reading, TIMESTAMP_FORMAT};
use crate::error::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

const COLUMNS: &str =
    "timestamp, pm10, pm2_5, co, no2, so2, o3, temp, humidity, wind_speed";

/// Append readings to the series table (no deduplication)
pub fn append_readings(conn: &Connection, readings: &[Reading]) -> Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO ghg_data (timestamp, pm10, pm2_5, co, no2, so2, o3, temp, humidity, wind_speed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;

    for r in readings {
        stmt.execute(params![
            r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            r.pm10,
            r.pm2_5,
            r.co,
            r.no2,
            r.so2,
            r.o3,
            r.temp,
            r.humidity,
            r.wind_speed,
        ])?;
    }

    Ok(readings.len())
}

/// Load all readings ascending by timestamp
pub fn load_readings(conn: &Connection) -> Result<Vec<Reading>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM ghg_data ORDER BY timestamp ASC"
    ))?;

    let readings = stmt
        .query_map([], |row| {
            let raw_ts: String = row.get(0)?;
            let timestamp = parse_timestamp(&raw_ts).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(Reading {
                timestamp,
                pm10: row.get(1)?,
                pm2_5: row.get(2)?,
                co: row.get(3)?,
                no2: row.get(4)?,
                so2: row.get(5)?,
                o3: row.get(6)?,
                temp: row.get(7)?,
                humidity: row.get(8)?,
                wind_speed: row.get(9)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(readings)
}

/// Count rows in the series table
pub fn count_readings(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM ghg_data", [], |row| row.get(0))?;
    Ok(count)
}

/// Replace the whole series table with a cleaned set of readings
///
/// Runs in a single transaction so a failure leaves the original rows
/// untouched.
pub fn replace_readings(conn: &mut Connection, readings: &[Reading]) -> Result<usize> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM ghg_data", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO ghg_data (timestamp, pm10, pm2_5, co, no2, so2, o3, temp, humidity, wind_speed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for r in readings {
            stmt.execute(params![
                r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                r.pm10,
                r.pm2_5,
                r.co,
                r.no2,
                r.so2,
                r.o3,
                r.temp,
                r.humidity,
                r.wind_speed,
            ])?;
        }
    }

    tx.commit()?;
    Ok(readings.len())
}

fn parse_timestamp(raw: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::migrations::run_migrations;
    use chrono::NaiveDate;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn reading(hour: u32, co: Option<f64>) -> Reading {
        let mut r = Reading::empty(
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        );
        r.co = co;
        r
    }

    #[test]
    fn test_append_and_load_ordered() {
        let conn = create_test_db();

        // Insert out of order
        append_readings(&conn, &[reading(5, Some(300.0)), reading(2, Some(100.0))]).unwrap();
        append_readings(&conn, &[reading(3, None)]).unwrap();

        let loaded = load_readings(&conn).unwrap();
        assert_eq!(loaded.len(), 3);
        let hours: Vec<u32> = loaded
            .iter()
            .map(|r| chrono::Timelike::hour(&r.timestamp))
            .collect();
        assert_eq!(hours, vec![2, 3, 5]);
        assert_eq!(loaded[0].co, Some(100.0));
        assert!(loaded[1].co.is_none());
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let conn = create_test_db();

        append_readings(&conn, &[reading(1, Some(10.0))]).unwrap();
        append_readings(&conn, &[reading(1, Some(20.0))]).unwrap();

        assert_eq!(count_readings(&conn).unwrap(), 2);
    }

    #[test]
    fn test_null_fields_survive_round_trip() {
        let conn = create_test_db();

        let mut r = reading(7, Some(42.0));
        r.no2 = Some(45.0);
        append_readings(&conn, &[r]).unwrap();

        let loaded = load_readings(&conn).unwrap();
        assert_eq!(loaded[0].co, Some(42.0));
        assert_eq!(loaded[0].no2, Some(45.0));
        assert!(loaded[0].pm10.is_none());
        assert!(loaded[0].o3.is_none());
    }

    #[test]
    fn test_replace_readings() {
        let mut conn = create_test_db();

        append_readings(&conn, &[reading(1, Some(1.0)), reading(1, Some(2.0))]).unwrap();
        assert_eq!(count_readings(&conn).unwrap(), 2);

        replace_readings(&mut conn, &[reading(1, Some(1.0))]).unwrap();
        let loaded = load_readings(&conn).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].co, Some(1.0));
    }
}
