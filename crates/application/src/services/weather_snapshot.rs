//! Shared weather snapshot
//!
//! Holds the most recent successful reading. Writers publish a whole new
//! snapshot with one atomic pointer swap; readers get an owned `Arc` and can
//! never observe a half-written reading.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use domain::WeatherReading;

/// A reading together with the time it was fetched
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// The reading itself
    pub reading: WeatherReading,
    /// When the reading was received
    pub fetched_at: DateTime<Utc>,
}

/// Single-slot store for the latest [`WeatherSnapshot`]
///
/// Empty until the first successful fetch. No history is kept.
pub struct SnapshotStore {
    slot: ArcSwapOption<WeatherSnapshot>,
}

impl SnapshotStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    /// Latest snapshot, if any
    #[must_use]
    pub fn load(&self) -> Option<Arc<WeatherSnapshot>> {
        self.slot.load_full()
    }

    /// Replace the snapshot with a reading fetched now
    pub fn publish(&self, reading: WeatherReading) -> Arc<WeatherSnapshot> {
        self.publish_at(reading, Utc::now())
    }

    /// Replace the snapshot with a reading fetched at `fetched_at`
    pub fn publish_at(
        &self,
        reading: WeatherReading,
        fetched_at: DateTime<Utc>,
    ) -> Arc<WeatherSnapshot> {
        let snapshot = Arc::new(WeatherSnapshot {
            reading,
            fetched_at,
        });
        self.slot.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// Whether no reading has been published yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.load().is_none()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.slot.load();
        f.debug_struct("SnapshotStore")
            .field("city", &current.as_ref().map(|s| s.reading.city().to_string()))
            .field("fetched_at", &current.as_ref().map(|s| s.fetched_at))
            .finish()
    }
}
