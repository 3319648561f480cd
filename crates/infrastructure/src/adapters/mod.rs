//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod capture_adapter;
mod speech_adapter;
mod weather_adapter;

pub use capture_adapter::CaptureAdapter;
pub use speech_adapter::SpeechAdapter;
pub use weather_adapter::WeatherAdapter;
