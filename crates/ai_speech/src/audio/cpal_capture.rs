//! Microphone capture through cpal

use std::sync::mpsc;
use std::time::Duration;

use async_trait::async_trait;
use cpal::StreamConfig;
use cpal::traits::{DeviceTrait, StreamTrait};
use tracing::{debug, error, info, instrument, warn};

use super::device::{best_config, device_name, input_device};
use super::resample::resample;
use super::{millis, wav};
use crate::config::AudioDeviceConfig;
use crate::error::SpeechError;
use crate::ports::AudioRecorder;
use crate::types::{AudioData, AudioFormat};

/// Records a fixed listen window from the host's input device and returns
/// it as 16-bit mono WAV at the configured rate
#[derive(Debug, Clone)]
pub struct CpalRecorder {
    config: AudioDeviceConfig,
}

impl CpalRecorder {
    /// Create a new recorder; the device is opened per recording
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: AudioDeviceConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }
}

/// Open the device, record for `window` and return mono samples at the
/// configured rate. Blocks the calling thread.
fn capture_blocking(config: &AudioDeviceConfig, window: Duration) -> Result<Vec<f32>, SpeechError> {
    let host = cpal::default_host();
    let device = input_device(&host, config.input_device.as_deref())?;
    let name = device_name(&device);

    let configs = device.supported_input_configs().map_err(|e| {
        SpeechError::CaptureFailed(format!("Failed to query input formats of '{name}': {e}"))
    })?;
    let supported = best_config(configs, config.sample_rate).ok_or_else(|| {
        SpeechError::NotAvailable(format!("Input device '{name}' offers no f32 mono or stereo format"))
    })?;

    let channels = usize::from(supported.channels());
    let device_rate = supported.sample_rate();
    let stream_config: StreamConfig = supported.config();
    info!(device = %name, device_rate, channels, "🎤 Listening");

    let (tx, rx) = mpsc::channel::<Vec<f32>>();
    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Receiver outlives the stream; a failed send only happens on teardown
                let _ = tx.send(wav::mix_to_mono(data, channels));
            },
            |err| error!("Audio capture error: {}", err),
            None,
        )
        .map_err(|e| SpeechError::CaptureFailed(format!("Failed to open input stream: {e}")))?;
    stream
        .play()
        .map_err(|e| SpeechError::CaptureFailed(format!("Failed to start input stream: {e}")))?;

    std::thread::sleep(window);
    drop(stream);

    let samples: Vec<f32> = rx.try_iter().flatten().collect();
    if samples.is_empty() {
        return Err(SpeechError::CaptureFailed("No audio was captured".to_string()));
    }
    debug!(samples = samples.len(), device_rate, "Capture complete");

    resample(&samples, device_rate, config.sample_rate)
}

#[async_trait]
impl AudioRecorder for CpalRecorder {
    #[instrument(skip(self), fields(window_ms = window.as_millis()))]
    async fn record(&self, window: Duration) -> Result<AudioData, SpeechError> {
        let config = self.config.clone();
        let deadline = window + Duration::from_secs(self.config.grace_secs);

        // The blocking thread ends on its own after `window`; the deadline
        // only stops us waiting for a device that never returns.
        let task = tokio::task::spawn_blocking(move || capture_blocking(&config, window));
        let samples = tokio::time::timeout(deadline, task)
            .await
            .map_err(|_| {
                warn!("Capture overran its listen window");
                SpeechError::Timeout(millis(deadline))
            })?
            .map_err(|e| SpeechError::CaptureFailed(format!("Capture task failed: {e}")))??;

        let data = wav::encode_mono(&samples, self.config.sample_rate)
            .map_err(|e| SpeechError::CaptureFailed(format!("Failed to encode WAV: {e}")))?;

        Ok(AudioData::new(data, AudioFormat::Wav)
            .with_duration(millis(window))
            .with_sample_rate(self.config.sample_rate))
    }
}
