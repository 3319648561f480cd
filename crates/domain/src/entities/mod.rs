//! Domain entities

mod weather_reading;

pub use weather_reading::WeatherReading;
