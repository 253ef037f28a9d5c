//! Fixed-length windowing of a scalar series

use crate::error::{AppError, Result};

/// Build overlapping training windows with one-step-ahead targets
///
/// Input `i` is `series[i..i + window]`, target `i` is `series[i + window]`.
/// Produces exactly `max(0, len - window)` pairs; a series no longer than
/// the window yields an empty set.
pub fn make_training_set(series: &[f64], window: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    if series.len() <= window {
        return (Vec::new(), Vec::new());
    }

    let count = series.len() - window;
    let mut inputs = Vec::with_capacity(count);
    let mut targets = Vec::with_capacity(count);

    for i in 0..count {
        inputs.push(series[i..i + window].to_vec());
        targets.push(series[i + window]);
    }

    (inputs, targets)
}

/// Take the last `window` contiguous values of the series
///
/// Reports `InsufficientData` when the series is shorter than the window;
/// callers surface this as a non-fatal "not enough data" state.
pub fn inference_window(series: &[f64], window: usize) -> Result<&[f64]> {
    if series.len() < window {
        return Err(AppError::InsufficientData {
            needed: window,
            got: series.len(),
        });
    }

    Ok(&series[series.len() - window..])
}
