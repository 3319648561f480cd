//! Weather provider configuration.

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Weather provider and refresh settings
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// WeatherAPI.com key (sensitive)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// City to report on
    #[serde(default = "default_city")]
    pub city: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language for condition text
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Seconds between background refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_city() -> String {
    "Lyon".to_string()
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

const fn default_refresh_interval() -> u64 {
    600
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            city: default_city(),
            base_url: default_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("city", &self.city)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .finish()
    }
}

impl WeatherAppConfig {
    /// Get the API key as a string reference (for API calls)
    #[must_use]
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key.as_ref().map(ExposeSecret::expose_secret)
    }

    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Settings for the WeatherAPI.com client
    #[must_use]
    pub fn client_config(&self) -> integration_weather::WeatherConfig {
        integration_weather::WeatherConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key_str().unwrap_or_default().to_string(),
            language: self.language.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Validate the configuration
    ///
    /// A missing API key is not an error here: the server still starts and
    /// every fetch fails until one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.city.trim().is_empty() {
            return Err("weather.city must not be empty".to_string());
        }
        if self.refresh_interval_secs == 0 {
            return Err("weather.refresh_interval_secs must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("weather.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
