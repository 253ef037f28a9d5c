//! SQLite database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp text format used in the `ghg_data` table (sortable)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One canonical hourly air-quality observation
///
/// Every measurement field is nullable: a field is `Some` only when the
/// source payload actually supplied it. Absent pollutants stay `None` and
/// are never stored as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub o3: Option<f64>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl Reading {
    /// Create a reading with all measurement fields absent
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            pm10: None,
            pm2_5: None,
            co: None,
            no2: None,
            so2: None,
            o3: None,
            temp: None,
            humidity: None,
            wind_speed: None,
        }
    }

    /// Get a measurement by field (capability check for optional columns)
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::Pm10 => self.pm10,
            Field::Pm25 => self.pm2_5,
            Field::Co => self.co,
            Field::No2 => self.no2,
            Field::So2 => self.so2,
            Field::O3 => self.o3,
            Field::Temp => self.temp,
            Field::Humidity => self.humidity,
            Field::WindSpeed => self.wind_speed,
        }
    }

    /// Set a measurement by field
    pub fn set_value(&mut self, field: Field, value: Option<f64>) {
        match field {
            Field::Pm10 => self.pm10 = value,
            Field::Pm25 => self.pm2_5 = value,
            Field::Co => self.co = value,
            Field::No2 => self.no2 = value,
            Field::So2 => self.so2 = value,
            Field::O3 => self.o3 = value,
            Field::Temp => self.temp = value,
            Field::Humidity => self.humidity = value,
            Field::WindSpeed => self.wind_speed = value,
        }
    }
}

/// Measurement fields tracked per reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Pm10,
    #[serde(rename = "pm2_5")]
    Pm25,
    Co,
    No2,
    So2,
    O3,
    Temp,
    Humidity,
    WindSpeed,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Pm10,
        Field::Pm25,
        Field::Co,
        Field::No2,
        Field::So2,
        Field::O3,
        Field::Temp,
        Field::Humidity,
        Field::WindSpeed,
    ];

    /// Canonical short column name in the `ghg_data` table
    pub fn column(&self) -> &'static str {
        match self {
            Field::Pm10 => "pm10",
            Field::Pm25 => "pm2_5",
            Field::Co => "co",
            Field::No2 => "no2",
            Field::So2 => "so2",
            Field::O3 => "o3",
            Field::Temp => "temp",
            Field::Humidity => "humidity",
            Field::WindSpeed => "wind_speed",
        }
    }

    /// Variable name used by the Open-Meteo Air Quality API
    pub fn api_name(&self) -> &'static str {
        match self {
            Field::Pm10 => "pm10",
            Field::Pm25 => "pm2_5",
            Field::Co => "carbon_monoxide",
            Field::No2 => "nitrogen_dioxide",
            Field::So2 => "sulphur_dioxide",
            Field::O3 => "ozone",
            Field::Temp => "temperature_2m",
            Field::Humidity => "relative_humidity_2m",
            Field::WindSpeed => "wind_speed_10m",
        }
    }

    /// Unit used when presenting values to the operator
    pub fn display_unit(&self) -> &'static str {
        match self {
            Field::Co | Field::O3 => "mg/m³",
            Field::Pm10 | Field::Pm25 | Field::No2 | Field::So2 => "µg/m³",
            Field::Temp => "°C",
            Field::Humidity => "%",
            Field::WindSpeed => "km/h",
        }
    }

    /// Convert a raw value (native API units) into display units
    ///
    /// CO and O₃ arrive in µg/m³ and are reported in mg/m³. This conversion
    /// is applied exactly once, at the presentation/forecast boundary; the
    /// store and scaler always operate on raw units.
    pub fn to_display(&self, raw: f64) -> f64 {
        match self {
            Field::Co | Field::O3 => raw / 1000.0,
            _ => raw,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_reading_has_no_measurements() {
        let r = Reading::empty(ts());
        for field in Field::ALL {
            assert!(r.value(field).is_none());
        }
    }

    #[test]
    fn test_set_and_get_value() {
        let mut r = Reading::empty(ts());
        r.set_value(Field::Co, Some(1234.5));
        assert_eq!(r.value(Field::Co), Some(1234.5));
        assert_eq!(r.co, Some(1234.5));
        assert!(r.value(Field::O3).is_none());
    }

    #[test]
    fn test_display_conversion_co_and_o3_only() {
        assert!((Field::Co.to_display(1234.5) - 1.2345).abs() < 1e-12);
        assert!((Field::O3.to_display(250.0) - 0.25).abs() < 1e-12);
        assert_eq!(Field::No2.to_display(45.0), 45.0);
        assert_eq!(Field::Pm10.to_display(80.0), 80.0);
    }

    #[test]
    fn test_api_name_mapping() {
        assert_eq!(Field::Co.api_name(), "carbon_monoxide");
        assert_eq!(Field::No2.api_name(), "nitrogen_dioxide");
        assert_eq!(Field::So2.api_name(), "sulphur_dioxide");
        assert_eq!(Field::O3.api_name(), "ozone");
        assert_eq!(Field::Temp.api_name(), "temperature_2m");
        assert_eq!(Field::Humidity.api_name(), "relative_humidity_2m");
        assert_eq!(Field::WindSpeed.api_name(), "wind_speed_10m");
        // pm10 / pm2_5 pass through unchanged
        assert_eq!(Field::Pm10.api_name(), Field::Pm10.column());
        assert_eq!(Field::Pm25.api_name(), Field::Pm25.column());
    }
}
