//! Piper local text-to-speech provider
//!
//! Pipes text into the Piper CLI and reads the WAV it writes to a temporary file.
//!
//! | Language | Voice | Notes |
//! |----------|-------|-------|
//! | English | en_US-lessac-medium | Clear American English |
//! | English | en_GB-alan-medium | British English |
//! | French | fr_FR-siwis-medium | Natural French female voice |

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::config::LocalTtsConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat};

/// Local TTS provider using Piper
#[derive(Debug, Clone)]
pub struct PiperProvider {
    config: LocalTtsConfig,
}

impl PiperProvider {
    /// Create a new Piper provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: LocalTtsConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Voice model for a voice name, falling back to the default model
    fn voice_model_path(&self, voice: Option<&str>) -> &Path {
        let voice_name = voice.unwrap_or(&self.config.default_voice);
        self.config
            .voices
            .get(voice_name)
            .map_or(&self.config.default_model_path, PathBuf::as_path)
    }

    fn build_command(&self, model_path: &Path, output_path: &Path) -> Command {
        let mut cmd = Command::new(self.executable());
        cmd.arg("--model")
            .arg(model_path)
            .arg("--output_file")
            .arg(output_path)
            .arg("--length_scale")
            .arg(self.config.length_scale.to_string())
            .arg("--sentence_silence")
            .arg(self.config.sentence_silence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl TextToSpeech for PiperProvider {
    #[instrument(skip(self, text), fields(voice = ?voice, text_len = text.len()))]
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to create temp file: {e}"))
        })?;

        let mut cmd = self.build_command(self.voice_model_path(voice), output_file.path());
        debug!(command = ?cmd, "Running piper");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "Piper not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::SynthesisFailed(format!("Failed to run piper: {e}"))
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(|e| {
                SpeechError::SynthesisFailed(format!("Failed to write to piper stdin: {e}"))
            })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(format!("Failed to wait for piper: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::SynthesisFailed(format!(
                "Piper exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let audio_data = tokio::fs::read(output_file.path()).await.map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to read piper output: {e}"))
        })?;

        if audio_data.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Piper produced empty output".to_string(),
            ));
        }

        Ok(AudioData::new(audio_data, AudioFormat::Wav))
    }

    fn model_name(&self) -> &str {
        &self.config.default_voice
    }
}
