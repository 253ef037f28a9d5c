//! CO forecasting pipeline
//!
//! Turns the tail of the stored pollutant series into a single next-hour
//! prediction: scale with the training-time min-max state, window the last
//! 24 values, run the sequence model, invert the scaling, convert units.

pub mod model;
pub mod pipeline;
pub mod scaler;
pub mod window;

pub use model::{ForecastArtifact, ForecastModel, LstmModel};
pub use pipeline::{forecast_next, Forecast};
pub use scaler::MinMaxScaler;

/// Input sequence length the model was trained with.
///
/// Shared between training-set construction and inference; a mismatch is a
/// correctness bug, not a configuration knob.
pub const WINDOW_SIZE: usize = 24;

/// Minimum non-null samples before a forecast is attempted.
///
/// Usability guard, distinct from the structural `WINDOW_SIZE` requirement.
pub const MIN_HISTORY: usize = 30;
