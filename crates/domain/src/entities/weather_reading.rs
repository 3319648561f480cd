//! Weather reading entity
//!
//! One observation of current conditions for a city. A reading is never mutated
//! after construction; a newer observation replaces it wholesale.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;
use crate::value_objects::{Humidity, Measurement, TemperatureBand};

/// Current conditions for one city
///
/// Serialises as a flat object with the keys `city`, `temperature`, `humidity`,
/// `wind_speed`, `description`, `pressure` and `precipitation`. Absent optional
/// measurements serialise as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    city: String,
    temperature: Measurement,
    humidity: Humidity,
    wind_speed: Measurement,
    description: String,
    pressure: Option<Measurement>,
    precipitation: Option<Measurement>,
}

impl WeatherReading {
    /// Create a reading without the optional pressure and precipitation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if `city` is blank.
    pub fn new(
        city: impl Into<String>,
        temperature: Measurement,
        humidity: Humidity,
        wind_speed: Measurement,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let city = city.into();
        if city.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "city must not be empty".to_string(),
            ));
        }

        Ok(Self {
            city,
            temperature,
            humidity,
            wind_speed,
            description: description.into(),
            pressure: None,
            precipitation: None,
        })
    }

    /// Attach a pressure measurement (hPa)
    #[must_use]
    pub const fn with_pressure(mut self, pressure: Option<Measurement>) -> Self {
        self.pressure = pressure;
        self
    }

    /// Attach a precipitation measurement (mm)
    #[must_use]
    pub const fn with_precipitation(mut self, precipitation: Option<Measurement>) -> Self {
        self.precipitation = precipitation;
        self
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Air temperature in °C
    #[must_use]
    pub const fn temperature(&self) -> Measurement {
        self.temperature
    }

    #[must_use]
    pub const fn humidity(&self) -> Humidity {
        self.humidity
    }

    /// Wind speed in km/h
    #[must_use]
    pub const fn wind_speed(&self) -> Measurement {
        self.wind_speed
    }

    /// Provider condition text, e.g. "Partly cloudy"
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Pressure in hPa, if reported
    #[must_use]
    pub const fn pressure(&self) -> Option<Measurement> {
        self.pressure
    }

    /// Precipitation in mm, if reported
    #[must_use]
    pub const fn precipitation(&self) -> Option<Measurement> {
        self.precipitation
    }

    /// Precipitation in mm, treating an unreported value as zero
    #[must_use]
    pub fn precipitation_or_zero(&self) -> Measurement {
        self.precipitation.unwrap_or(Measurement::ZERO)
    }

    /// Whether any precipitation is falling
    #[must_use]
    pub fn has_precipitation(&self) -> bool {
        self.precipitation_or_zero().is_positive()
    }

    /// Comfort band of the current temperature
    #[must_use]
    pub fn temperature_band(&self) -> TemperatureBand {
        TemperatureBand::from_celsius(self.temperature.value())
    }
}

struct OptionalMeasurement(Option<Measurement>);

impl fmt::Display for OptionalMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for WeatherReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weather in {}: {}", self.city, self.description)?;
        writeln!(f, "Temperature: {}°C", self.temperature)?;
        writeln!(f, "Humidity: {}%", self.humidity)?;
        writeln!(f, "Wind: {} km/h", self.wind_speed)?;
        writeln!(f, "Pressure: {} hPa", OptionalMeasurement(self.pressure))?;
        write!(
            f,
            "Precipitation: {} mm",
            OptionalMeasurement(self.precipitation)
        )
    }
}
