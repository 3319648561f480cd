//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod audio_capture_port;
mod speech_port;
mod weather_port;

pub use audio_capture_port::{AudioCapturePort, CapturedAudio};
pub use speech_port::SpeechPort;
pub use weather_port::WeatherPort;

#[cfg(test)]
pub use audio_capture_port::MockAudioCapturePort;
#[cfg(test)]
pub use speech_port::MockSpeechPort;
#[cfg(test)]
pub use weather_port::MockWeatherPort;
