//! Periodic weather refresh task
//!
//! Keeps the shared snapshot current by fetching a new reading once per
//! interval. A failed fetch leaves the previous snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use application::WeatherService;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Spawn a background task that refreshes the weather snapshot forever.
///
/// The caller is expected to have done the startup fetch already, so the
/// first refresh happens one `interval` after spawning. Missed ticks are
/// delayed rather than bursted.
///
/// Returns a `JoinHandle` that can be used to abort the task when shutting down.
///
/// # Example
///
/// ```ignore
/// service.refresh().await;
/// let refresh_handle = spawn_weather_refresh_task(Arc::clone(&service), Duration::from_secs(600));
///
/// // On shutdown:
/// refresh_handle.abort();
/// ```
pub fn spawn_weather_refresh_task(
    service: Arc<WeatherService>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(
        city = %service.city(),
        interval_secs = interval.as_secs(),
        "Starting weather refresh task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Startup fetch already happened
        ticker.tick().await;

        loop {
            ticker.tick().await;
            debug!("Running scheduled weather refresh");

            if service.refresh().await.is_none() {
                debug!(
                    has_previous = service.current().is_some(),
                    "Scheduled refresh failed, keeping previous snapshot"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use application::{ApplicationError, SnapshotStore, WeatherPort};
    use async_trait::async_trait;
    use domain::{Humidity, Measurement, WeatherReading};

    use super::*;

    /// Succeeds on every call except the ones listed in `failing`
    struct CountingPort {
        calls: AtomicUsize,
        failing: Vec<usize>,
    }

    impl CountingPort {
        fn new(failing: Vec<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failing,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherPort for CountingPort {
        async fn fetch_reading(&self, city: &str) -> Result<WeatherReading, ApplicationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.failing.contains(&call) {
                return Err(ApplicationError::ExternalService("timeout".to_string()));
            }
            #[allow(clippy::cast_precision_loss)]
            let temperature = call as f64;
            Ok(WeatherReading::new(
                city,
                Measurement::new("temperature", temperature).unwrap(),
                Humidity::new(50).unwrap(),
                Measurement::new("wind_speed", 5.0).unwrap(),
                "Clear",
            )
            .unwrap())
        }
    }

    fn service(port: &Arc<CountingPort>) -> Arc<WeatherService> {
        Arc::new(WeatherService::new(
            Arc::clone(port) as Arc<dyn WeatherPort>,
            Arc::new(SnapshotStore::new()),
            "Lyon",
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn first_refresh_waits_one_interval() {
        let port = Arc::new(CountingPort::new(vec![]));
        let handle = spawn_weather_refresh_task(service(&port), Duration::from_secs(600));

        tokio::time::sleep(Duration::from_secs(599)).await;
        assert_eq!(port.call_count(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(port.call_count(), 1);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_every_interval() {
        let port = Arc::new(CountingPort::new(vec![]));
        let service = service(&port);
        let handle = spawn_weather_refresh_task(Arc::clone(&service), Duration::from_secs(600));

        tokio::time::sleep(Duration::from_secs(1801)).await;
        assert_eq!(port.call_count(), 3);

        let snapshot = service.current().unwrap();
        assert!((snapshot.reading.temperature().value() - 3.0).abs() < f64::EPSILON);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_previous_snapshot() {
        let port = Arc::new(CountingPort::new(vec![2]));
        let service = service(&port);
        let handle = spawn_weather_refresh_task(Arc::clone(&service), Duration::from_secs(600));

        tokio::time::sleep(Duration::from_secs(601)).await;
        let first = service.current().unwrap();

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(port.call_count(), 2);
        let after_failure = service.current().unwrap();
        assert!(Arc::ptr_eq(&first, &after_failure));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn abort_stops_refreshing() {
        let port = Arc::new(CountingPort::new(vec![]));
        let handle = spawn_weather_refresh_task(service(&port), Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(61)).await;
        handle.abort();
        let _ = handle.await;

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(port.call_count(), 1);
    }
}
