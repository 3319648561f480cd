//! WeatherAPI.com client
//!
//! HTTP client for the `current.json` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{ApiResponse, CurrentConditions};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No API key configured
    #[error("Missing API key for weather service")]
    MissingApiKey,

    /// Blank city name
    #[error("Invalid city: name must not be empty")]
    InvalidCity,

    /// The provider answered with an error object
    #[error("Provider error{}: {message}", code_suffix(.code))]
    Provider { code: Option<i64>, message: String },

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

#[allow(clippy::ref_option)]
fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" {c}")).unwrap_or_default()
}

/// Weather service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API base URL (default: <http://api.weatherapi.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// WeatherAPI.com key
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Language for condition text (default: "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Weather client trait for fetching current conditions
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get current conditions for a city name
    async fn get_current(&self, city: &str) -> Result<CurrentConditions, WeatherError>;
}

/// WeatherAPI.com HTTP client implementation
#[derive(Debug)]
pub struct WeatherApiClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherApiClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.config.base_url.trim_end_matches('/'))
    }

    /// Interpret a response body
    ///
    /// An `error` object wins over everything else, regardless of HTTP status.
    fn parse_body(city: &str, body: &str) -> Result<CurrentConditions, WeatherError> {
        let response: ApiResponse =
            serde_json::from_str(body).map_err(|e| WeatherError::ParseError(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(WeatherError::Provider {
                code: error.code,
                message: error.message,
            });
        }

        let current = response.current.ok_or_else(|| {
            WeatherError::ParseError("No current weather data in response".to_string())
        })?;

        Ok(current.into_conditions(city, response.location))
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), fields(city = %city))]
    async fn get_current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        if city.trim().is_empty() {
            return Err(WeatherError::InvalidCity);
        }
        if self.config.api_key.is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        debug!(url = %self.current_url(), "Fetching current weather");

        let response = self
            .client
            .get(self.current_url())
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", city),
                ("lang", self.config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        match Self::parse_body(city, &body) {
            Err(WeatherError::ParseError(_)) if !status.is_success() => {
                Err(WeatherError::RequestFailed(format!("HTTP {status}")))
            },
            Err(e @ WeatherError::Provider { .. }) => {
                warn!(error = %e, "Weather provider reported an error");
                Err(e)
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.base_url, "http://api.weatherapi.com/v1");
        assert_eq!(config.language, "en");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = WeatherConfig {
            api_key: "super-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = WeatherConfig {
            api_key: "super-secret".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn current_url_tolerates_trailing_slash() {
        let client = WeatherApiClient::new(WeatherConfig {
            base_url: "http://localhost:9000/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.current_url(), "http://localhost:9000/v1/current.json");
    }

    #[test]
    fn parse_body_prefers_error_object() {
        let body = r#"{"error": {"code": 1006, "message": "No matching location found."}}"#;
        let result = WeatherApiClient::parse_body("Atlantis", body);
        assert!(matches!(
            result,
            Err(WeatherError::Provider { code: Some(1006), .. })
        ));
    }

    #[test]
    fn parse_body_requires_current_block() {
        let result = WeatherApiClient::parse_body("Lyon", r#"{"location": {"name": "Lyon"}}"#);
        assert!(matches!(result, Err(WeatherError::ParseError(_))));
    }

    #[test]
    fn error_display() {
        let err = WeatherError::Provider {
            code: Some(2006),
            message: "API key is invalid.".to_string(),
        };
        assert_eq!(err.to_string(), "Provider error 2006: API key is invalid.");

        let err = WeatherError::Provider {
            code: None,
            message: "Unknown".to_string(),
        };
        assert_eq!(err.to_string(), "Provider error: Unknown");

        assert!(WeatherError::RateLimitExceeded.to_string().contains("Rate limit"));
    }

    #[tokio::test]
    async fn blank_city_fails_before_request() {
        let client = WeatherApiClient::new(WeatherConfig {
            api_key: "k".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            client.get_current("   ").await,
            Err(WeatherError::InvalidCity)
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_before_request() {
        let client = WeatherApiClient::new(WeatherConfig::default()).unwrap();
        assert!(matches!(
            client.get_current("Lyon").await,
            Err(WeatherError::MissingApiKey)
        ));
    }
}
