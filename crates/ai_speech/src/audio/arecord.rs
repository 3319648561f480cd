//! Microphone capture via `arecord`, for hosts where cpal cannot open the device

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::millis;
use crate::config::AudioDeviceConfig;
use crate::error::SpeechError;
use crate::ports::AudioRecorder;
use crate::types::{AudioData, AudioFormat};

/// Records 16-bit mono WAV clips from an ALSA capture device
#[derive(Debug, Clone)]
pub struct ArecordRecorder {
    config: AudioDeviceConfig,
}

impl ArecordRecorder {
    /// Create a new recorder
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: AudioDeviceConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    /// `arecord` only takes whole seconds; partial seconds round up
    fn window_secs(window: Duration) -> u64 {
        let secs = window.as_secs() + u64::from(window.subsec_nanos() > 0);
        secs.max(1)
    }

    fn build_command(&self, output_path: &Path, window: Duration) -> Command {
        let mut cmd = Command::new(&self.config.recorder_path);
        cmd.arg("-q")
            .arg("-f")
            .arg("S16_LE")
            .arg("-c")
            .arg("1")
            .arg("-r")
            .arg(self.config.sample_rate.to_string())
            .arg("-d")
            .arg(Self::window_secs(window).to_string())
            .arg("-t")
            .arg("wav");

        if let Some(device) = &self.config.input_device {
            cmd.arg("-D").arg(device);
        }

        cmd.arg(output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl AudioRecorder for ArecordRecorder {
    #[instrument(skip(self), fields(window_ms = window.as_millis()))]
    async fn record(&self, window: Duration) -> Result<AudioData, SpeechError> {
        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::CaptureFailed(format!("Failed to create temp file: {e}"))
        })?;

        let mut cmd = self.build_command(output_file.path(), window);
        debug!(command = ?cmd, "Starting capture");

        let deadline = window + Duration::from_secs(self.config.grace_secs);
        let output = tokio::time::timeout(deadline, cmd.output())
            .await
            .map_err(|_| {
                warn!("Recorder overran its listen window");
                SpeechError::Timeout(millis(deadline))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SpeechError::NotAvailable(format!(
                        "Recorder not found at '{}'",
                        self.config.recorder_path.display()
                    ))
                } else {
                    SpeechError::CaptureFailed(format!("Failed to run recorder: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::CaptureFailed(format!(
                "Recorder exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let data = tokio::fs::read(output_file.path())
            .await
            .map_err(|e| SpeechError::CaptureFailed(format!("Failed to read capture: {e}")))?;

        if data.is_empty() {
            return Err(SpeechError::CaptureFailed(
                "No audio was captured".to_string(),
            ));
        }

        debug!(audio_size = data.len(), "Capture complete");

        Ok(AudioData::new(data, AudioFormat::Wav)
            .with_duration(millis(window))
            .with_sample_rate(self.config.sample_rate))
    }
}
