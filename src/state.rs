//! Application state management

use crate::config::AppConfig;
use crate::db::sqlite::SqliteDb;
use crate::error::{AppError, Result};
use crate::forecast::ForecastArtifact;
use crate::services::geocode_service::GeocodeClient;
use crate::services::ingest_service::IngestClient;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Currently selected observation point
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
}

impl Location {
    /// Validate a coordinate pair
    pub fn validate(latitude: f64, longitude: f64) -> Result<()> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Validation(format!(
                "latitude {latitude} out of range [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(format!(
                "longitude {longitude} out of range [-180, 180]"
            )));
        }
        Ok(())
    }
}

/// Application state shared across all commands
pub struct AppState {
    /// SQLite series store
    pub sqlite: Arc<SqliteDb>,

    /// Air-quality API client
    pub ingest: IngestClient,

    /// Rate-limited geocoder, one per process
    pub geocoder: GeocodeClient,

    /// Loaded configuration
    pub config: AppConfig,

    /// Application data directory
    pub data_dir: PathBuf,

    /// Currently selected location
    location: RwLock<Location>,

    /// Cached forecast artifact (loaded lazily, read-only afterwards)
    model: RwLock<Option<Arc<ForecastArtifact>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Data directory: {:?}", data_dir);

        let config = AppConfig::load(&data_dir)?;
        let sqlite = Arc::new(SqliteDb::new(&config.database_path(&data_dir))?);

        let ingest = IngestClient::new(Duration::from_secs(config.request_timeout_secs));
        let geocoder = GeocodeClient::new();

        let location = Location {
            latitude: config.latitude,
            longitude: config.longitude,
            label: None,
        };

        Ok(Self {
            sqlite,
            ingest,
            geocoder,
            config,
            data_dir,
            location: RwLock::new(location),
            model: RwLock::new(None),
        })
    }

    /// Get the currently selected location
    pub fn get_location(&self) -> Location {
        self.location.read().clone()
    }

    /// Set the selected location after validating the coordinates
    ///
    /// On validation failure the previous valid location is retained.
    pub fn set_location(&self, latitude: f64, longitude: f64, label: Option<String>) -> Result<()> {
        Location::validate(latitude, longitude)?;
        *self.location.write() = Location {
            latitude,
            longitude,
            label,
        };
        Ok(())
    }

    /// Path of the forecast model artifact
    pub fn model_path(&self) -> PathBuf {
        self.config.model_path(&self.data_dir)
    }

    /// Cached forecast artifact, if already loaded
    pub fn cached_model(&self) -> Option<Arc<ForecastArtifact>> {
        self.model.read().clone()
    }

    /// Cache a loaded forecast artifact
    pub fn cache_model(&self, artifact: Arc<ForecastArtifact>) {
        *self.model.write() = Some(artifact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_state_uses_config_defaults() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();

        let loc = state.get_location();
        assert_eq!(loc.latitude, crate::config::DEFAULT_LATITUDE);
        assert_eq!(loc.longitude, crate::config::DEFAULT_LONGITUDE);
        assert!(loc.label.is_none());
        assert_eq!(state.sqlite.count_readings().unwrap(), 0);
    }

    #[test]
    fn test_set_location_validates_and_retains_previous() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();

        state
            .set_location(51.5, -0.12, Some("London".to_string()))
            .unwrap();

        let err = state.set_location(123.0, 0.0, None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Previous valid location still in place
        let loc = state.get_location();
        assert_eq!(loc.latitude, 51.5);
        assert_eq!(loc.label.as_deref(), Some("London"));
    }

    #[test]
    fn test_location_validation_bounds() {
        assert!(Location::validate(90.0, 180.0).is_ok());
        assert!(Location::validate(-90.0, -180.0).is_ok());
        assert!(Location::validate(90.1, 0.0).is_err());
        assert!(Location::validate(0.0, -180.5).is_err());
        assert!(Location::validate(f64::NAN, 0.0).is_err());
    }
}
