//! Report Service
//!
//! Latest-value and trend summaries over the canonical series, with the
//! pollutant display conversion applied here at the presentation boundary
//! and nowhere earlier.

use crate::db::sqlite::models::{Field, Reading};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Most recent non-null value of one field, in display units
#[derive(Debug, Clone, Serialize)]
pub struct LatestReading {
    pub field: Field,
    pub value: f64,
    pub unit: &'static str,
    pub timestamp: NaiveDateTime,
}

/// One chart-ready trend point, in display units
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Report service for business logic
pub struct ReportService;

impl ReportService {
    /// Most recent non-null value of a field
    ///
    /// `None` when the column is absent from the series (schema gap, not an
    /// error).
    pub fn latest(readings: &[Reading], field: Field) -> Option<LatestReading> {
        readings
            .iter()
            .rev()
            .find_map(|r| r.value(field).map(|raw| (r.timestamp, raw)))
            .map(|(timestamp, raw)| LatestReading {
                field,
                value: field.to_display(raw),
                unit: field.display_unit(),
                timestamp,
            })
    }

    /// Chart-ready series of a field's non-null values in timestamp order
    pub fn trend_series(readings: &[Reading], field: Field) -> Vec<TrendPoint> {
        readings
            .iter()
            .filter_map(|r| {
                r.value(field).map(|raw| TrendPoint {
                    timestamp: r.timestamp,
                    value: field.to_display(raw),
                })
            })
            .collect()
    }
}
