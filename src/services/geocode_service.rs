//! Geocode Service
//!
//! Forward geocoding of place names through Nominatim. The client owns its
//! own minimum-interval throttle state and is constructed once per process;
//! lookups return a typed outcome instead of swallowing errors.

use crate::error::{AppError, Result};
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

const BASE_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "ghg-monitor/1.0";

/// Result of a forward geocode lookup
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Found {
        latitude: f64,
        longitude: f64,
        display_name: String,
    },
    NotFound,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

/// Rate-limited Nominatim client
pub struct GeocodeClient {
    client: Client,
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl GeocodeClient {
    pub fn new() -> Self {
        Self::with_min_interval(Duration::from_secs(1))
    }

    pub fn with_min_interval(min_interval: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .expect("Failed to create HTTP client"),
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Resolve a place name to coordinates
    pub async fn forward(&self, place: &str) -> Result<GeocodeOutcome> {
        info!("GeocodeClient::forward - '{}'", place);
        self.throttle().await;

        let response = self
            .client
            .get(BASE_URL)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Api(format!(
                "geocode request failed with status {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        match places.into_iter().next() {
            Some(place) => {
                let latitude: f64 = place.lat.parse().map_err(|_| {
                    AppError::Api(format!("geocoder returned bad latitude '{}'", place.lat))
                })?;
                let longitude: f64 = place.lon.parse().map_err(|_| {
                    AppError::Api(format!("geocoder returned bad longitude '{}'", place.lon))
                })?;
                Ok(GeocodeOutcome::Found {
                    latitude,
                    longitude,
                    display_name: place.display_name,
                })
            }
            None => Ok(GeocodeOutcome::NotFound),
        }
    }

    /// Wait until the minimum interval since the previous call has passed
    async fn throttle(&self) {
        let wait = {
            let last = self.last_call.lock();
            match *last {
                Some(at) => self.min_interval.saturating_sub(at.elapsed()),
                None => Duration::ZERO,
            }
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        *self.last_call.lock() = Some(Instant::now());
    }
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_throttle_enforces_min_interval() {
        let client = GeocodeClient::with_min_interval(Duration::from_millis(50));

        let start = Instant::now();
        client.throttle().await;
        client.throttle().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_place_parsing() {
        let places: Vec<NominatimPlace> = serde_json::from_str(
            r#"[{"lat": "22.5726", "lon": "88.3639", "display_name": "Kolkata, West Bengal, India"}]"#,
        )
        .unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].lat, "22.5726");
        assert!(places[0].display_name.starts_with("Kolkata"));
    }

    #[test]
    fn test_empty_result_list_deserializes() {
        let places: Vec<NominatimPlace> = serde_json::from_str("[]").unwrap();
        assert!(places.is_empty());
    }
}
