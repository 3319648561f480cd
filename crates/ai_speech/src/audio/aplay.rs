//! Speaker playback via `aplay`

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::{millis, wav};
use crate::config::AudioDeviceConfig;
use crate::error::SpeechError;
use crate::ports::AudioPlayer;
use crate::types::{AudioData, AudioFormat};

/// Upper bound for clips whose WAV header does not give a length
const UNKNOWN_LENGTH_LIMIT: Duration = Duration::from_secs(60);

/// Plays WAV clips on an ALSA playback device
#[derive(Debug, Clone)]
pub struct AplayPlayer {
    config: AudioDeviceConfig,
}

impl AplayPlayer {
    /// Create a new player
    #[must_use]
    pub const fn new(config: AudioDeviceConfig) -> Self {
        Self { config }
    }

    fn build_command(&self, input_path: &Path) -> Command {
        let mut cmd = Command::new(&self.config.player_path);
        cmd.arg("-q");
        if let Some(device) = &self.config.output_device {
            cmd.arg("-D").arg(device);
        }
        cmd.arg(input_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Clip length plus the configured grace period
    fn deadline(&self, audio: &AudioData) -> Duration {
        wav::duration(audio.data()).map_or(UNKNOWN_LENGTH_LIMIT, |length| {
            length + Duration::from_secs(self.config.grace_secs)
        })
    }
}

#[async_trait]
impl AudioPlayer for AplayPlayer {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes()))]
    async fn play(&self, audio: &AudioData) -> Result<(), SpeechError> {
        if audio.format() != AudioFormat::Wav {
            return Err(SpeechError::PlaybackFailed(format!(
                "aplay cannot play {:?}",
                audio.format()
            )));
        }
        if audio.is_empty() {
            return Ok(());
        }

        let input_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::PlaybackFailed(format!("Failed to create temp file: {e}"))
        })?;
        tokio::fs::write(input_file.path(), audio.data())
            .await
            .map_err(|e| SpeechError::PlaybackFailed(format!("Failed to write audio: {e}")))?;

        let mut cmd = self.build_command(input_file.path());
        debug!(command = ?cmd, "Starting playback");

        let deadline = self.deadline(audio);
        let output = tokio::time::timeout(deadline, cmd.output())
            .await
            .map_err(|_| {
                warn!("Player overran the clip length, stopping it");
                SpeechError::Timeout(millis(deadline))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SpeechError::NotAvailable(format!(
                        "Player not found at '{}'",
                        self.config.player_path.display()
                    ))
                } else {
                    SpeechError::PlaybackFailed(format!("Failed to run player: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::PlaybackFailed(format!(
                "Player exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn command_targets_device() {
        let player = AplayPlayer::new(AudioDeviceConfig {
            output_device: Some("default".to_string()),
            ..Default::default()
        });
        let args: Vec<String> = player
            .build_command(Path::new("/tmp/a.wav"))
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["-q", "-D", "default", "/tmp/a.wav"]);
    }

    #[test]
    fn deadline_follows_clip_length() {
        let player = AplayPlayer::new(AudioDeviceConfig::default());
        let two_seconds = wav::encode_mono(&vec![0.0; 32_000], 16_000).unwrap();

        assert_eq!(
            player.deadline(&AudioData::new(two_seconds, AudioFormat::Wav)),
            Duration::from_secs(4)
        );
        assert_eq!(
            player.deadline(&AudioData::new(vec![1, 2, 3], AudioFormat::Wav)),
            UNKNOWN_LENGTH_LIMIT
        );
    }

    #[tokio::test]
    async fn rejects_non_wav() {
        let player = AplayPlayer::new(AudioDeviceConfig::default());
        let result = player.play(&AudioData::new(vec![1], AudioFormat::Mp3)).await;
        assert!(matches!(result, Err(SpeechError::PlaybackFailed(_))));
    }

    #[tokio::test]
    async fn empty_clip_is_a_no_op() {
        let player = AplayPlayer::new(AudioDeviceConfig {
            player_path: PathBuf::from("/nonexistent/aplay"),
            ..Default::default()
        });
        assert!(player.play(&AudioData::new(vec![], AudioFormat::Wav)).await.is_ok());
    }

    #[tokio::test]
    async fn missing_player_is_not_available() {
        let player = AplayPlayer::new(AudioDeviceConfig {
            player_path: PathBuf::from("/nonexistent/aplay"),
            ..Default::default()
        });
        let result = player.play(&AudioData::new(vec![1, 2], AudioFormat::Wav)).await;
        assert!(matches!(result, Err(SpeechError::NotAvailable(_))));
    }
}
