//! GHG Monitor entry point
//!
//! One request-driven monitor cycle: optionally resolve a place name given
//! on the command line, fetch the hourly series for the selected location,
//! clean duplicates, report latest values, forecast next-hour CO. Every
//! recoverable failure is rendered as a warning; none of them abort the run.

use ghg_monitor_lib::commands;
use ghg_monitor_lib::db::sqlite::models::Field;
use ghg_monitor_lib::error::{AppError, ErrorResponse};
use ghg_monitor_lib::state::AppState;
use std::path::PathBuf;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ghg_monitor_lib::init_tracing();
    info!("Starting GHG Monitor...");

    let data_dir = std::env::var("GHG_MONITOR_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let state = AppState::new(data_dir)?;

    if let Some(place) = std::env::args().nth(1) {
        match commands::location::search_location(&state, &place).await {
            Ok(location) => info!(
                "Found: {} ({:.4}, {:.4})",
                location.label.as_deref().unwrap_or("?"),
                location.latitude,
                location.longitude
            ),
            Err(err) => render_warning(err),
        }
    }

    match commands::readings::fetch_air_quality(&state).await {
        Ok(resp) => info!(
            "Fetched {} readings for {:.4}, {:.4}",
            resp.fetched, resp.location.latitude, resp.location.longitude
        ),
        Err(err) => render_warning(err),
    }

    match commands::readings::merge_clean(&state) {
        Ok(result) => info!(
            "Series cleaned: {} rows, {} duplicates removed",
            result.after, result.removed
        ),
        Err(err) => render_warning(err),
    }

    match commands::readings::latest_readings(&state) {
        Ok(latest) => {
            for reading in latest {
                if matches!(reading.field, Field::Co | Field::No2 | Field::O3) {
                    info!(
                        "Latest {}: {:.4} {} at {}",
                        reading.field, reading.value, reading.unit, reading.timestamp
                    );
                }
            }
        }
        Err(err) => render_warning(err),
    }

    match commands::forecast::forecast_co(&state) {
        Ok(forecast) => info!(
            "Forecasted next-hour {}: {:.4} {} (from {} samples)",
            forecast.field, forecast.value, forecast.unit, forecast.samples
        ),
        Err(err) => render_warning(err),
    }

    Ok(())
}

fn render_warning(err: AppError) {
    let response = ErrorResponse::from(err);
    warn!(code = %response.code, "{}", response.message);
}
