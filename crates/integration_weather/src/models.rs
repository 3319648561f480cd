//! Weather data models
//!
//! Wire types for the WeatherAPI.com `current.json` payload and the
//! provider-neutral [`CurrentConditions`] handed to callers.

use serde::{Deserialize, Serialize};

/// Current conditions for a requested city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// City exactly as requested
    pub city: String,
    /// Location name resolved by the provider, if reported
    pub resolved_location: Option<String>,
    /// Air temperature in °C
    pub temperature_c: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Condition text, e.g. "Light rain"
    pub condition: String,
    /// Pressure in hPa (millibars)
    pub pressure_mb: Option<f64>,
    /// Precipitation in mm
    pub precip_mm: Option<f64>,
    /// Provider's local observation timestamp, e.g. "2026-10-19 14:15"
    pub last_updated: Option<String>,
}

/// Top-level `current.json` response
///
/// Error payloads share the same envelope, carrying only `error`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub location: Option<LocationData>,
    pub current: Option<CurrentData>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationData {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentData {
    pub temp_c: f64,
    pub humidity: f64,
    pub wind_kph: f64,
    pub condition: ConditionData,
    #[serde(default)]
    pub pressure_mb: Option<f64>,
    #[serde(default)]
    pub precip_mm: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionData {
    pub text: String,
}

/// Provider-reported error object, e.g. `{"code": 1006, "message": "No matching location found."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl CurrentData {
    pub(crate) fn into_conditions(
        self,
        city: &str,
        location: Option<LocationData>,
    ) -> CurrentConditions {
        CurrentConditions {
            city: city.to_string(),
            resolved_location: location.map(|l| l.name),
            temperature_c: self.temp_c,
            humidity: self.humidity,
            wind_kph: self.wind_kph,
            condition: self.condition.text,
            pressure_mb: self.pressure_mb,
            precip_mm: self.precip_mm,
            last_updated: self.last_updated,
        }
    }
}
