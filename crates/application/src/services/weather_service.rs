//! Weather service
//!
//! Keeps the shared snapshot fresh for one configured city. A failed fetch is
//! logged and leaves the previous snapshot in place.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::weather_snapshot::{SnapshotStore, WeatherSnapshot};
use crate::ports::WeatherPort;

/// Fetches readings for the configured city and publishes them
pub struct WeatherService {
    port: Arc<dyn WeatherPort>,
    store: Arc<SnapshotStore>,
    city: String,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("city", &self.city)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    #[must_use]
    pub fn new(
        port: Arc<dyn WeatherPort>,
        store: Arc<SnapshotStore>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            port,
            store,
            city: city.into(),
        }
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// The shared store readers load from
    #[must_use]
    pub const fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Latest snapshot without fetching
    #[must_use]
    pub fn current(&self) -> Option<Arc<WeatherSnapshot>> {
        self.store.load()
    }

    /// Fetch a fresh reading and publish it
    ///
    /// Returns the new snapshot, or `None` when the fetch failed. On failure
    /// the previous snapshot stays in place.
    #[instrument(skip(self), fields(city = %self.city))]
    pub async fn refresh(&self) -> Option<Arc<WeatherSnapshot>> {
        match self.port.fetch_reading(&self.city).await {
            Ok(reading) => {
                info!(
                    temperature = %reading.temperature(),
                    description = %reading.description(),
                    "Weather data updated"
                );
                Some(self.store.publish(reading))
            },
            Err(e) => {
                warn!(
                    error = %e,
                    retryable = e.is_retryable(),
                    has_previous = !self.store.is_empty(),
                    "Failed to fetch weather data"
                );
                None
            },
        }
    }

    /// Latest snapshot, fetching one first if nothing has been published yet
    pub async fn current_or_refresh(&self) -> Option<Arc<WeatherSnapshot>> {
        match self.current() {
            Some(snapshot) => Some(snapshot),
            None => self.refresh().await,
        }
    }
}
