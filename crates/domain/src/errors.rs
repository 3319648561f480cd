//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A measurement was NaN or infinite
    #[error("Invalid measurement for {field}: {value}")]
    InvalidMeasurement { field: &'static str, value: f64 },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid measurement error
    pub const fn invalid_measurement(field: &'static str, value: f64) -> Self {
        Self::InvalidMeasurement { field, value }
    }
}
