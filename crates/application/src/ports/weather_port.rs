//! Weather service port
//!
//! Defines the interface for retrieving current conditions.

use async_trait::async_trait;
use domain::WeatherReading;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather provider operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetch the current reading for a city
    ///
    /// Provider error payloads, transport failures and malformed responses
    /// all surface as `Err`; callers decide how to degrade.
    async fn fetch_reading(&self, city: &str) -> Result<WeatherReading, ApplicationError>;
}
