//! Forecast orchestration
//!
//! "Forecast the next value of pollutant P from the live series": guard on
//! history length, extract the non-null column, scale with the artifact's
//! fitted scaler, window, predict, invert, convert units. Every step failure is a
//! typed error; the pipeline never emits a number derived from a short window
//! or a failed model.

use crate::db::sqlite::models::{Field, Reading};
use crate::error::{AppError, Result};
use crate::forecast::model::ForecastModel;
use crate::forecast::scaler::MinMaxScaler;
use crate::forecast::window::inference_window;
use crate::forecast::{MIN_HISTORY, WINDOW_SIZE};
use serde::Serialize;

/// A single next-hour prediction, already unit-converted for display
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub field: Field,
    /// Display-unit value (e.g. mg/m³ for CO)
    pub value: f64,
    /// Native-unit value as the API reports it (e.g. µg/m³ for CO)
    pub raw: f64,
    pub unit: &'static str,
    /// Non-null samples the forecast was based on
    pub samples: usize,
}

/// Forecast the next hourly value of `field` from the live series
///
/// `readings` must already be in timestamp order (the store loads them that
/// way). `scaler` is the training-time state persisted with the model; it is
/// applied as-is, never refitted here.
pub fn forecast_next(
    readings: &[Reading],
    field: Field,
    scaler: &MinMaxScaler,
    model: &dyn ForecastModel,
) -> Result<Forecast> {
    // Usability guard on the live series itself: below this there is no
    // point attempting a forecast. Distinct from the structural WINDOW_SIZE
    // check on the null-dropped column below; both stay.
    if readings.len() < MIN_HISTORY {
        return Err(AppError::InsufficientHistory {
            needed: MIN_HISTORY,
            got: readings.len(),
        });
    }

    let series: Vec<f64> = readings.iter().filter_map(|r| r.value(field)).collect();

    let scaled = scaler.transform(&series);
    let window = inference_window(&scaled, WINDOW_SIZE)?;

    let predicted_scaled = model.predict(window)?;
    let raw = scaler.inverse(predicted_scaled);
    let value = field.to_display(raw);

    tracing::debug!(
        field = %field,
        samples = series.len(),
        raw,
        value,
        "forecast produced"
    );

    Ok(Forecast {
        field,
        value,
        raw,
        unit: field.display_unit(),
        samples: series.len(),
    })
}
