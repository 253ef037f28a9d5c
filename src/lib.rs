//! GHG Monitor - Location-based Air Quality Monitoring
//!
//! Fetches hourly pollutant measurements from the Open-Meteo Air Quality
//! API, persists them in an append-only SQLite table, and forecasts the next
//! hourly carbon-monoxide concentration with a trained LSTM artifact.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod forecast;
pub mod services;
pub mod state;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghg_monitor_lib=debug,ghg_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
