//! Weather adapter - Implements WeatherPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::WeatherPort;
use async_trait::async_trait;
use domain::{Humidity, Measurement, WeatherReading};
use integration_weather::{
    CurrentConditions, WeatherApiClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument};

/// Adapter for the WeatherAPI.com client
pub struct WeatherAdapter {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("client", &"WeatherClient")
            .finish()
    }
}

impl WeatherAdapter {
    /// Create an adapter backed by WeatherAPI.com
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client =
            WeatherApiClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Wrap any weather client
    #[must_use]
    pub fn with_client(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            err @ WeatherError::Provider { .. } => {
                ApplicationError::ExternalService(err.to_string())
            },
            WeatherError::ParseError(e) => {
                ApplicationError::Internal(format!("Invalid weather response: {e}"))
            },
            WeatherError::MissingApiKey => {
                ApplicationError::Configuration("weather.api_key is not set".into())
            },
            WeatherError::InvalidCity => {
                ApplicationError::Configuration("weather.city must not be empty".into())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }

    /// Convert provider conditions into a domain reading
    fn to_reading(conditions: CurrentConditions) -> Result<WeatherReading, ApplicationError> {
        let optional = |field: &'static str, value: Option<f64>| {
            value.map(|v| Measurement::new(field, v)).transpose()
        };

        let reading = WeatherReading::new(
            conditions.city,
            Measurement::new("temperature", conditions.temperature_c)?,
            Humidity::from_provider(conditions.humidity),
            Measurement::new("wind_speed", conditions.wind_kph)?,
            conditions.condition,
        )?
        .with_pressure(optional("pressure", conditions.pressure_mb)?)
        .with_precipitation(optional("precipitation", conditions.precip_mm)?);

        Ok(reading)
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self))]
    async fn fetch_reading(&self, city: &str) -> Result<WeatherReading, ApplicationError> {
        let conditions = self
            .client
            .get_current(city)
            .await
            .map_err(Self::map_error)?;

        debug!(
            resolved_location = ?conditions.resolved_location,
            last_updated = ?conditions.last_updated,
            "Retrieved current conditions"
        );

        Self::to_reading(conditions)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn conditions() -> CurrentConditions {
        CurrentConditions {
            city: "Lyon".to_string(),
            resolved_location: Some("Lyon".to_string()),
            temperature_c: 12.0,
            humidity: 81.4,
            wind_kph: 7.2,
            condition: "Mist".to_string(),
            pressure_mb: Some(1009.0),
            precip_mm: None,
            last_updated: None,
        }
    }

    #[test]
    fn maps_conditions_to_reading() {
        let reading = WeatherAdapter::to_reading(conditions()).unwrap();
        assert_eq!(reading.city(), "Lyon");
        assert_eq!(reading.temperature().to_string(), "12.0");
        assert_eq!(reading.humidity().value(), 81);
        assert_eq!(reading.wind_speed().to_string(), "7.2");
        assert_eq!(reading.description(), "Mist");
        assert_eq!(reading.pressure().map(|p| p.value()), Some(1009.0));
        assert!(reading.precipitation().is_none());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut bad = conditions();
        bad.wind_kph = f64::NAN;
        assert!(matches!(
            WeatherAdapter::to_reading(bad),
            Err(ApplicationError::Domain(_))
        ));
    }

    #[test]
    fn map_error_connection_failed() {
        let err = WeatherAdapter::map_error(WeatherError::ConnectionFailed("timeout".into()));
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[test]
    fn map_error_provider_keeps_message() {
        let err = WeatherAdapter::map_error(WeatherError::Provider {
            code: Some(1006),
            message: "No matching location found.".into(),
        });
        match err {
            ApplicationError::ExternalService(msg) => {
                assert!(msg.contains("No matching location found."));
            },
            other => panic!("Expected ExternalService, got: {other:?}"),
        }
    }

    #[test]
    fn map_error_missing_key_is_configuration() {
        let err = WeatherAdapter::map_error(WeatherError::MissingApiKey);
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn map_error_rate_limited() {
        let err = WeatherAdapter::map_error(WeatherError::RateLimitExceeded);
        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[tokio::test]
    async fn fetches_reading_over_http() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "location": {"name": "Lyon"},
                "current": {
                    "temp_c": 21.5,
                    "humidity": 40,
                    "wind_kph": 3.6,
                    "condition": {"text": "Sunny"},
                    "pressure_mb": 1018.0,
                    "precip_mm": 0.2
                }
            })))
            .mount(&mock_server)
            .await;

        let adapter = WeatherAdapter::with_config(WeatherConfig {
            base_url: mock_server.uri(),
            api_key: "test-key".into(),
            ..Default::default()
        })
        .unwrap();

        let reading = adapter.fetch_reading("Lyon").await.unwrap();
        assert_eq!(reading.temperature().to_string(), "21.5");
        assert!(reading.has_precipitation());

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["humidity"], 40);
        assert_eq!(json["precipitation"], 0.2);
    }

    #[tokio::test]
    async fn provider_error_becomes_external_service() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": 2006, "message": "API key is invalid."}
            })))
            .mount(&mock_server)
            .await;

        let adapter = WeatherAdapter::with_config(WeatherConfig {
            base_url: mock_server.uri(),
            api_key: "bad-key".into(),
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            adapter.fetch_reading("Lyon").await,
            Err(ApplicationError::ExternalService(_))
        ));
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WeatherAdapter>();
    }
}
