//! Capture adapter - Implements AudioCapturePort with a microphone recorder

use std::sync::Arc;
use std::time::Duration;

use ai_speech::{AudioDeviceConfig, AudioFormat, AudioRecorder, SpeechError, recorder_for};
use application::error::ApplicationError;
use application::ports::{AudioCapturePort, CapturedAudio};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter recording questions from the microphone
pub struct CaptureAdapter {
    recorder: Arc<dyn AudioRecorder>,
}

impl std::fmt::Debug for CaptureAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureAdapter").finish_non_exhaustive()
    }
}

impl CaptureAdapter {
    /// Record through the configured audio backend
    ///
    /// # Errors
    ///
    /// Returns an error if the device configuration is invalid or the
    /// backend is not compiled in.
    pub fn from_config(devices: &AudioDeviceConfig) -> Result<Self, ApplicationError> {
        let recorder = recorder_for(devices)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(recorder))
    }

    #[must_use]
    pub fn new(recorder: Arc<dyn AudioRecorder>) -> Self {
        Self { recorder }
    }

    fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Timeout(ms) => {
                ApplicationError::Capture(format!("listening timed out after {ms}ms"))
            },
            SpeechError::CaptureFailed(e) | SpeechError::NotAvailable(e) => {
                ApplicationError::Capture(e)
            },
            other => ApplicationError::Capture(other.to_string()),
        }
    }
}

#[async_trait]
impl AudioCapturePort for CaptureAdapter {
    #[instrument(skip(self), fields(window_ms = window.as_millis()))]
    async fn capture(&self, window: Duration) -> Result<CapturedAudio, ApplicationError> {
        let clip = self
            .recorder
            .record(window)
            .await
            .map_err(Self::map_error)?;

        if clip.format() != AudioFormat::Wav {
            return Err(ApplicationError::Capture(format!(
                "recorder produced {:?}, expected WAV",
                clip.format()
            )));
        }
        if clip.is_empty() {
            return Err(ApplicationError::Capture("recording is empty".to_string()));
        }

        debug!(bytes = clip.size_bytes(), "Recorded clip");

        let sample_rate = clip.sample_rate();
        let duration_ms = clip.duration_ms();
        Ok(CapturedAudio {
            wav: clip.into_data(),
            sample_rate,
            duration_ms,
        })
    }
}
