//! Ingest Service
//!
//! Fetches hourly air-quality data from the Open-Meteo Air Quality API and
//! normalizes the variable-name payload into canonical readings.

use crate::db::sqlite::models::{Field, Reading};
use crate::error::{AppError, Result};
use crate::state::AppState;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

const BASE_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

// ============================================================================
// Payload types and schema normalization
// ============================================================================

/// Raw provider response: only the `hourly` block matters here
#[derive(Debug, Deserialize)]
pub struct AirQualityResponse {
    pub hourly: Option<HourlyBlock>,
}

/// Hourly block: a timestamp array plus parallel per-variable arrays
///
/// Arrays are index-aligned with `time`; individual entries may be null.
#[derive(Debug, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(flatten)]
    pub series: HashMap<String, Vec<Option<f64>>>,
}

/// Normalize a provider payload into canonical readings
///
/// One reading per timestamp index. Columns present are exactly the
/// intersection of `requested` and what the payload supplied; a variable
/// missing from the payload is a schema gap, not an error. A payload without
/// an `hourly` block normalizes to an empty series ("no data").
pub fn normalize(payload: &AirQualityResponse, requested: &[Field]) -> Result<Vec<Reading>> {
    let hourly = match &payload.hourly {
        Some(block) => block,
        None => return Ok(Vec::new()),
    };

    let mut readings = Vec::with_capacity(hourly.time.len());
    for (i, raw_ts) in hourly.time.iter().enumerate() {
        let timestamp = parse_hourly_timestamp(raw_ts)?;
        let mut reading = Reading::empty(timestamp);
        for &field in requested {
            if let Some(values) = hourly.series.get(field.api_name()) {
                reading.set_value(field, values.get(i).copied().flatten());
            }
        }
        readings.push(reading);
    }

    Ok(readings)
}

fn parse_hourly_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| AppError::Api(format!("unparseable timestamp '{raw}' in payload")))
}

// ============================================================================
// HTTP client
// ============================================================================

/// Air-quality API client
pub struct IngestClient {
    client: Client,
}

impl IngestClient {
    /// Build a client with the given request timeout (the only enforced
    /// timeout in the system)
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch and normalize hourly data for a coordinate
    pub async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        fields: &[Field],
    ) -> Result<Vec<Reading>> {
        let hourly_param = fields
            .iter()
            .map(|f| f.api_name())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", hourly_param),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Api(format!(
                "air quality request failed with status {}",
                response.status()
            )));
        }

        let payload: AirQualityResponse = response.json().await?;
        normalize(&payload, fields)
    }
}

impl Default for IngestClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(20))
    }
}

// ============================================================================
// Service
// ============================================================================

/// Ingest service for business logic
pub struct IngestService;

impl IngestService {
    /// Fetch the hourly series for the current location and append it to the
    /// store
    pub async fn refresh(state: &AppState) -> Result<Vec<Reading>> {
        let location = state.get_location();
        info!(
            "IngestService::refresh - {:.6}, {:.6}",
            location.latitude, location.longitude
        );

        let readings = state
            .ingest
            .fetch_hourly(
                location.latitude,
                location.longitude,
                &state.config.hourly_fields,
            )
            .await?;

        if readings.is_empty() {
            info!("Provider returned no hourly data");
            return Ok(readings);
        }

        state.sqlite.append_readings(&readings)?;
        info!("Appended {} readings to store", readings.len());

        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn requested() -> Vec<Field> {
        Field::ALL.to_vec()
    }

    #[test]
    fn test_normalize_full_payload() {
        let payload: AirQualityResponse = serde_json::from_value(json!({
            "latitude": 22.5726,
            "longitude": 88.3639,
            "hourly_units": { "time": "iso8601", "carbon_monoxide": "μg/m³" },
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "pm10": [12.0, 13.5],
                "carbon_monoxide": [210.0, null],
                "ozone": [60.0, 61.0]
            }
        }))
        .unwrap();

        let readings = normalize(&payload, &requested()).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].pm10, Some(12.0));
        assert_eq!(readings[0].co, Some(210.0));
        assert_eq!(readings[0].o3, Some(60.0));
        // Null entry stays absent, never zero
        assert!(readings[1].co.is_none());
        // Variables the payload did not supply stay absent
        assert!(readings[0].no2.is_none());
        assert!(readings[0].temp.is_none());
    }

    #[test]
    fn test_normalize_partial_fulfillment_is_not_an_error() {
        let payload: AirQualityResponse = serde_json::from_value(json!({
            "hourly": {
                "time": ["2024-06-01T00:00"],
                "carbon_monoxide": [199.0]
            }
        }))
        .unwrap();

        let readings = normalize(&payload, &requested()).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].co, Some(199.0));
        for field in Field::ALL {
            if field != Field::Co {
                assert!(readings[0].value(field).is_none());
            }
        }
    }

    #[test]
    fn test_normalize_missing_hourly_block_yields_empty() {
        let payload: AirQualityResponse =
            serde_json::from_value(json!({ "latitude": 0.0 })).unwrap();
        let readings = normalize(&payload, &requested()).unwrap();
        assert!(readings.is_empty());
    }

    #[test]
    fn test_normalize_only_requested_fields() {
        let payload: AirQualityResponse = serde_json::from_value(json!({
            "hourly": {
                "time": ["2024-06-01T00:00"],
                "carbon_monoxide": [199.0],
                "nitrogen_dioxide": [45.0]
            }
        }))
        .unwrap();

        let readings = normalize(&payload, &[Field::Co]).unwrap();
        assert_eq!(readings[0].co, Some(199.0));
        // Supplied but not requested: omitted
        assert!(readings[0].no2.is_none());
    }

    #[test]
    fn test_normalize_bad_timestamp_is_typed_failure() {
        let payload: AirQualityResponse = serde_json::from_value(json!({
            "hourly": {
                "time": ["not-a-time"],
                "carbon_monoxide": [199.0]
            }
        }))
        .unwrap();

        let err = normalize(&payload, &requested()).unwrap_err();
        assert!(matches!(err, AppError::Api(_)));
    }

    #[test]
    fn test_timestamp_parse_formats() {
        assert!(parse_hourly_timestamp("2024-06-01T05:00").is_ok());
        assert!(parse_hourly_timestamp("2024-06-01T05:00:00").is_ok());
        assert!(parse_hourly_timestamp("05:00").is_err());
    }
}
