//! Forecast commands

use crate::error::Result;
use crate::forecast::Forecast;
use crate::services::forecast_service::ForecastService;
use crate::state::AppState;

/// Forecast the next hourly CO concentration
pub fn forecast_co(state: &AppState) -> Result<Forecast> {
    ForecastService::forecast_next_co(state)
}
