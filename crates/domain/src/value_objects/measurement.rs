//! Decimal measurement value object
//!
//! Readings carry temperatures, wind speeds, pressures and precipitation as plain
//! decimals. Their textual form always shows at least one fractional digit, so a
//! whole value renders as `12.0` and a fractional one keeps its shortest exact form
//! (`12.5`, `0.25`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A finite decimal measurement
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measurement(f64);

impl Measurement {
    /// Zero, used when an optional measurement is absent
    pub const ZERO: Self = Self(0.0);

    /// Create a measurement, rejecting NaN and infinities
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMeasurement` when `value` is not finite.
    pub fn new(field: &'static str, value: f64) -> Result<Self, DomainError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(DomainError::invalid_measurement(field, value))
        }
    }

    /// Raw value
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether the measurement is strictly positive
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
