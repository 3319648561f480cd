//! Value Objects - Immutable, identity-less domain primitives

mod humidity;
mod measurement;
mod temperature_band;

pub use humidity::{Humidity, InvalidHumidity};
pub use measurement::Measurement;
pub use temperature_band::TemperatureBand;
