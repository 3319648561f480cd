//! Current reading as JSON

use axum::{Json, extract::State};
use domain::WeatherReading;

use crate::{error::ApiError, state::AppState};

/// Message returned when no reading could be obtained
pub const NO_WEATHER_DATA: &str = "Weather data is not available";

/// `GET /api/weather`
///
/// Falls back to an on-demand fetch before the first refresh has succeeded.
pub async fn current_weather(
    State(state): State<AppState>,
) -> Result<Json<WeatherReading>, ApiError> {
    state
        .weather
        .current_or_refresh()
        .await
        .map(|snapshot| Json(snapshot.reading.clone()))
        .ok_or_else(|| ApiError::ServiceUnavailable(NO_WEATHER_DATA.to_string()))
}
