//! Speaker playback through cpal

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use cpal::StreamConfig;
use cpal::traits::{DeviceTrait, StreamTrait};
use tracing::{debug, error, info, instrument, warn};

use super::device::{best_config, device_name, output_device};
use super::millis;
use super::resample::resample;
use super::wav::{self, MonoClip};
use crate::config::AudioDeviceConfig;
use crate::error::SpeechError;
use crate::ports::AudioPlayer;
use crate::types::{AudioData, AudioFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Time left for the device to flush its last buffer
const DRAIN_TAIL: Duration = Duration::from_millis(150);

/// Plays WAV clips on the host's output device, resampled to the
/// device's preferred rate
#[derive(Debug, Clone)]
pub struct CpalPlayer {
    config: AudioDeviceConfig,
}

impl CpalPlayer {
    /// Create a new player; the device is opened per clip
    #[must_use]
    pub const fn new(config: AudioDeviceConfig) -> Self {
        Self { config }
    }
}

#[allow(clippy::cast_precision_loss)]
fn play_blocking(config: &AudioDeviceConfig, clip: &MonoClip, slack: Duration) -> Result<(), SpeechError> {
    let host = cpal::default_host();
    let device = output_device(&host, config.output_device.as_deref())?;
    let name = device_name(&device);

    let preferred = device
        .default_output_config()
        .map_or(clip.sample_rate, |c| c.sample_rate());
    let configs = device.supported_output_configs().map_err(|e| {
        SpeechError::PlaybackFailed(format!("Failed to query output formats of '{name}': {e}"))
    })?;
    let supported = best_config(configs, preferred).ok_or_else(|| {
        SpeechError::NotAvailable(format!("Output device '{name}' offers no f32 mono or stereo format"))
    })?;

    let channels = usize::from(supported.channels());
    let device_rate = supported.sample_rate();
    let stream_config: StreamConfig = supported.config();

    let samples = resample(&clip.samples, clip.sample_rate, device_rate)?;
    let length = Duration::from_secs_f64(samples.len() as f64 / f64::from(device_rate));
    info!(device = %name, device_rate, length_ms = millis(length), "🔊 Playing");

    let finished = Arc::new(AtomicBool::new(false));
    let done = Arc::clone(&finished);
    let mut source = samples.into_iter();

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = source.next().unwrap_or_else(|| {
                        done.store(true, Ordering::Release);
                        0.0
                    });
                    frame.fill(sample);
                }
            },
            |err| error!("Audio playback error: {}", err),
            None,
        )
        .map_err(|e| SpeechError::PlaybackFailed(format!("Failed to open output stream: {e}")))?;
    stream
        .play()
        .map_err(|e| SpeechError::PlaybackFailed(format!("Failed to start output stream: {e}")))?;

    let limit = length + slack;
    let started = Instant::now();
    while !finished.load(Ordering::Acquire) {
        if started.elapsed() >= limit {
            warn!("Playback overran the clip length, stopping it");
            return Err(SpeechError::Timeout(millis(limit)));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    std::thread::sleep(DRAIN_TAIL);
    debug!("Playback complete");

    Ok(())
}

#[async_trait]
impl AudioPlayer for CpalPlayer {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes()))]
    async fn play(&self, audio: &AudioData) -> Result<(), SpeechError> {
        if audio.format() != AudioFormat::Wav {
            return Err(SpeechError::PlaybackFailed(format!(
                "Cannot play {:?}, only WAV is decoded",
                audio.format()
            )));
        }
        if audio.is_empty() {
            return Ok(());
        }

        let clip = wav::decode_mono(audio.data())
            .map_err(|e| SpeechError::PlaybackFailed(format!("Unreadable WAV: {e}")))?;
        if clip.samples.is_empty() {
            return Ok(());
        }

        let config = self.config.clone();
        let slack = Duration::from_secs(self.config.grace_secs);
        tokio::task::spawn_blocking(move || play_blocking(&config, &clip, slack))
            .await
            .map_err(|e| SpeechError::PlaybackFailed(format!("Playback task failed: {e}")))?
    }
}
