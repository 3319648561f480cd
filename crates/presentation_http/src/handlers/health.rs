//! Health check handler

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub weather: WeatherStatus,
}

/// Snapshot status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherStatus {
    pub city: String,
    pub available: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Liveness check, also reporting whether a reading has been fetched
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.weather.current();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weather: WeatherStatus {
            city: state.weather.city().to_string(),
            available: snapshot.is_some(),
            fetched_at: snapshot.map(|s| s.fetched_at),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serialization() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            weather: WeatherStatus {
                city: "Lyon".to_string(),
                available: false,
                fetched_at: None,
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["weather"]["available"], false);
        assert!(json["weather"]["fetched_at"].is_null());
    }
}
