//! Temperature band value object

use serde::{Deserialize, Serialize};

/// Coarse comfort band for an air temperature in °C
///
/// Thresholds are strict upper bounds: 5.0°C is already `Cool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    /// Below 5°C
    VeryCold,
    /// 5°C up to 12°C
    Cool,
    /// 12°C up to 20°C
    Pleasant,
    /// 20°C up to 25°C
    Nice,
    /// 25°C and above
    Hot,
}

impl TemperatureBand {
    /// Classify a temperature in °C
    #[must_use]
    pub fn from_celsius(celsius: f64) -> Self {
        if celsius < 5.0 {
            Self::VeryCold
        } else if celsius < 12.0 {
            Self::Cool
        } else if celsius < 20.0 {
            Self::Pleasant
        } else if celsius < 25.0 {
            Self::Nice
        } else {
            Self::Hot
        }
    }
}
