//! Service wiring from configuration
//!
//! Shared by the server and the CLI so both build the same object graph.

use std::sync::Arc;

use application::{ApplicationError, SnapshotStore, VoiceAssistantService, WeatherService};
use infrastructure::{AppConfig, CaptureAdapter, SpeechAdapter, WeatherAdapter};
use tracing::{info, warn};

/// Build the weather service over a fresh, empty snapshot store
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn weather_service(config: &AppConfig) -> Result<Arc<WeatherService>, ApplicationError> {
    if config.weather.api_key_str().is_none() {
        warn!("No WeatherAPI.com key configured, weather fetches will fail");
    }

    let adapter = WeatherAdapter::with_config(config.weather.client_config())?;
    Ok(Arc::new(WeatherService::new(
        Arc::new(adapter),
        Arc::new(SnapshotStore::new()),
        config.weather.city.clone(),
    )))
}

/// Build the voice assistant, or `None` when speech is unconfigured or broken
///
/// Failures here only disable voice; the rest of the application keeps running.
pub fn voice_assistant(
    config: &AppConfig,
    store: Arc<SnapshotStore>,
) -> Option<Arc<VoiceAssistantService>> {
    let Some(speech_config) = config.voice_settings() else {
        info!("Speech not configured, voice assistant disabled");
        return None;
    };

    let speech = match SpeechAdapter::from_config(speech_config, &config.capture) {
        Ok(adapter) => adapter,
        Err(e) => {
            warn!(error = %e, "Failed to initialize speech, voice assistant disabled");
            return None;
        },
    };

    let capture = match CaptureAdapter::from_config(&config.capture) {
        Ok(adapter) => adapter,
        Err(e) => {
            warn!(error = %e, "Failed to initialize microphone, voice assistant disabled");
            return None;
        },
    };

    info!(provider = ?speech_config.provider, "🔊 Voice assistant is ready");

    Some(Arc::new(
        VoiceAssistantService::new(Arc::new(capture), Arc::new(speech), store)
            .with_listen_window(config.capture.listen_timeout()),
    ))
}
