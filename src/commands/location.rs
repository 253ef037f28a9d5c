//! Location selection commands

use crate::error::{AppError, Result};
use crate::services::geocode_service::GeocodeOutcome;
use crate::state::{AppState, Location};

/// Resolve a place name and make it the current location
pub async fn search_location(state: &AppState, place: &str) -> Result<Location> {
    let place = place.trim();
    if place.is_empty() {
        return Err(AppError::Validation("location name is empty".to_string()));
    }

    match state.geocoder.forward(place).await? {
        GeocodeOutcome::Found {
            latitude,
            longitude,
            display_name,
        } => {
            state.set_location(latitude, longitude, Some(display_name))?;
            Ok(state.get_location())
        }
        GeocodeOutcome::NotFound => {
            Err(AppError::NotFound(format!("location '{place}' not found")))
        }
    }
}

/// Override the location with manually entered coordinates
///
/// Malformed input is a validation warning; the previous valid location
/// stays selected.
pub fn set_manual_location(state: &AppState, lat_input: &str, lon_input: &str) -> Result<Location> {
    let latitude: f64 = lat_input
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid latitude '{lat_input}'")))?;
    let longitude: f64 = lon_input
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid longitude '{lon_input}'")))?;

    state.set_location(
        latitude,
        longitude,
        Some(format!("Manual: {latitude}, {longitude}")),
    )?;
    Ok(state.get_location())
}

/// Get the currently selected location
pub fn get_location(state: &AppState) -> Location {
    state.get_location()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_manual_coordinates_accepted() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();

        let loc = set_manual_location(&state, " 48.85 ", "2.35").unwrap();
        assert_eq!(loc.latitude, 48.85);
        assert_eq!(loc.longitude, 2.35);
        assert!(loc.label.unwrap().starts_with("Manual:"));
    }

    #[test]
    fn test_malformed_coordinates_retain_previous_location() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();
        set_manual_location(&state, "10.0", "20.0").unwrap();

        let err = set_manual_location(&state, "ten", "20.0").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = set_manual_location(&state, "95.0", "20.0").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let loc = get_location(&state);
        assert_eq!(loc.latitude, 10.0);
        assert_eq!(loc.longitude, 20.0);
    }

    #[tokio::test]
    async fn test_empty_place_name_rejected_before_any_lookup() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();

        let err = search_location(&state, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
