//! Forecast Service
//!
//! Loads (and caches) the trained artifact, reads the stored series, and runs
//! the forecast pipeline. The artifact is read-only: nothing here mutates or
//! retrains it.

use crate::db::sqlite::models::Field;
use crate::error::Result;
use crate::forecast::{forecast_next, Forecast, ForecastArtifact};
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

/// Forecast service for business logic
pub struct ForecastService;

impl ForecastService {
    /// Forecast the next hourly CO concentration from the stored series
    pub fn forecast_next_co(state: &AppState) -> Result<Forecast> {
        Self::forecast_next_field(state, Field::Co)
    }

    /// Forecast the next hourly value of any pollutant field
    pub fn forecast_next_field(state: &AppState, field: Field) -> Result<Forecast> {
        let artifact = Self::load_artifact(state)?;
        let readings = state.sqlite.load_readings()?;

        info!(
            "ForecastService::forecast_next_field - {} over {} stored readings",
            field,
            readings.len()
        );

        forecast_next(&readings, field, &artifact.scaler, &artifact.model)
    }

    /// Load the artifact once per process and reuse it afterwards
    fn load_artifact(state: &AppState) -> Result<Arc<ForecastArtifact>> {
        if let Some(artifact) = state.cached_model() {
            return Ok(artifact);
        }

        let path = state.model_path();
        let artifact = Arc::new(ForecastArtifact::load(&path)?);
        info!("Loaded forecast artifact from {}", path.display());
        state.cache_model(artifact.clone());

        Ok(artifact)
    }
}
