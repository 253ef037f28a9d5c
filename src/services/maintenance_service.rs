//! Maintenance Service
//!
//! Periodic merge/clean of the append-only series: duplicate timestamps are
//! collapsed and the table is rewritten in ascending order. This is the only
//! path that removes rows.

use crate::db::sqlite::models::Reading;
use crate::error::Result;
use crate::state::AppState;
use serde::Serialize;
use tracing::info;

/// Outcome of a merge/clean pass
#[derive(Debug, Clone, Serialize)]
pub struct MergeCleanResult {
    pub before: usize,
    pub removed: usize,
    pub after: usize,
}

/// Sort ascending by timestamp and drop duplicate timestamps
///
/// Tie-break is first-seen after the (stable) sort: of several records
/// sharing a timestamp, the one earliest in the input survives.
pub fn deduplicate_and_sort(mut readings: Vec<Reading>) -> Vec<Reading> {
    readings.sort_by_key(|r| r.timestamp);
    readings.dedup_by_key(|r| r.timestamp);
    readings
}

/// Maintenance service for business logic
pub struct MaintenanceService;

impl MaintenanceService {
    /// Load, clean, and rewrite the whole series table
    pub fn merge_clean(state: &AppState) -> Result<MergeCleanResult> {
        let raw = state.sqlite.load_readings()?;
        let before = raw.len();

        let cleaned = deduplicate_and_sort(raw);
        let after = cleaned.len();
        state.sqlite.replace_readings(&cleaned)?;

        info!(
            "MaintenanceService::merge_clean - {} rows in, {} duplicates removed",
            before,
            before - after
        );

        Ok(MergeCleanResult {
            before,
            removed: before - after,
            after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn reading(hour: u32, co: f64) -> Reading {
        let mut r = Reading::empty(ts(hour));
        r.co = Some(co);
        r
    }

    #[test]
    fn test_dedup_keeps_first_seen_deterministically() {
        // Two records share hour 3 with differing payloads; the first-seen
        // one must survive, every time.
        let input = vec![
            reading(5, 50.0),
            reading(3, 30.0),
            reading(3, 999.0),
            reading(1, 10.0),
        ];

        for _ in 0..5 {
            let cleaned = deduplicate_and_sort(input.clone());
            assert_eq!(cleaned.len(), 3);
            assert_eq!(cleaned[0].timestamp, ts(1));
            assert_eq!(cleaned[1].timestamp, ts(3));
            assert_eq!(cleaned[1].co, Some(30.0));
            assert_eq!(cleaned[2].timestamp, ts(5));
        }
    }

    #[test]
    fn test_sort_ascending() {
        let cleaned = deduplicate_and_sort(vec![reading(9, 1.0), reading(2, 2.0), reading(7, 3.0)]);
        let hours: Vec<u32> = cleaned
            .iter()
            .map(|r| chrono::Timelike::hour(&r.timestamp))
            .collect();
        assert_eq!(hours, vec![2, 7, 9]);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate_and_sort(Vec::new()).is_empty());
    }
}
