//! Series ingestion and reporting commands

use crate::db::sqlite::models::{Field, Reading};
use crate::error::Result;
use crate::services::ingest_service::IngestService;
use crate::services::maintenance_service::{MaintenanceService, MergeCleanResult};
use crate::services::report_service::{LatestReading, ReportService, TrendPoint};
use crate::state::{AppState, Location};
use serde::Serialize;

/// Outcome of a fetch-and-store cycle
#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub fetched: usize,
    pub location: Location,
}

/// Fetch the hourly series for the current location and append it to the
/// store
pub async fn fetch_air_quality(state: &AppState) -> Result<FetchResponse> {
    let readings = IngestService::refresh(state).await?;
    Ok(FetchResponse {
        fetched: readings.len(),
        location: state.get_location(),
    })
}

/// Load stored readings, most recent `limit` rows when given
pub fn get_readings(state: &AppState, limit: Option<usize>) -> Result<Vec<Reading>> {
    let mut readings = state.sqlite.load_readings()?;
    if let Some(limit) = limit {
        if readings.len() > limit {
            readings.drain(..readings.len() - limit);
        }
    }
    Ok(readings)
}

/// Collapse duplicate timestamps and rewrite the series table
pub fn merge_clean(state: &AppState) -> Result<MergeCleanResult> {
    MaintenanceService::merge_clean(state)
}

/// Latest display-unit value per field, skipping absent columns
pub fn latest_readings(state: &AppState) -> Result<Vec<LatestReading>> {
    let readings = state.sqlite.load_readings()?;
    Ok(Field::ALL
        .iter()
        .filter_map(|&field| ReportService::latest(&readings, field))
        .collect())
}

/// Chart-ready trend of one field in display units
pub fn trend(state: &AppState, field: Field) -> Result<Vec<TrendPoint>> {
    let readings = state.sqlite.load_readings()?;
    Ok(ReportService::trend_series(&readings, field))
}
