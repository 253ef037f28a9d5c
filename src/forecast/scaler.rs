//! Min-max scaling with strict fit/apply separation
//!
//! A scaler is fitted once, on the training series, and persisted inside the
//! model artifact. Inference reuses that exact state and never refits on live
//! data, so the model always sees the normalization it was trained under.
//! Known limitation: if the live series drifts outside the fitted range the
//! scaled values fall outside [0, 1]; that staleness is accepted, not
//! silently corrected.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Fitted min-max range state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScaler {
    /// Fit a scaler to a reference series
    ///
    /// Fails on an empty series: the range would be undefined.
    pub fn fit(series: &[f64]) -> Result<Self> {
        if series.is_empty() {
            return Err(AppError::Validation(
                "cannot fit scaler to an empty series".to_string(),
            ));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in series {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }

        Ok(Self { min, max })
    }

    /// Map one value into the fitted range
    ///
    /// Degenerate ranges (`max == min`) map everything to 0.
    pub fn transform_one(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            0.0
        } else {
            (value - self.min) / range
        }
    }

    /// Map a series into the fitted range
    pub fn transform(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|&v| self.transform_one(v)).collect()
    }

    /// Map a scaled value back into physical units
    ///
    /// Values outside [0, 1] extrapolate; nothing is clamped.
    pub fn inverse(&self, scaled: f64) -> f64 {
        scaled * (self.max - self.min) + self.min
    }
}
