//! whisper.cpp local speech-to-text provider
//!
//! Runs the whisper.cpp CLI on a temporary WAV file and reads back the
//! `.txt` it writes next to it. Only WAV input is accepted; the recorder
//! already produces 16 kHz mono WAV, which is what whisper.cpp expects.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::config::LocalSttConfig;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::{AudioData, AudioFormat, Transcription};

/// Local STT provider using whisper.cpp
#[derive(Debug, Clone)]
pub struct WhisperCppProvider {
    config: LocalSttConfig,
}

impl WhisperCppProvider {
    /// Create a new whisper.cpp provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: LocalSttConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    fn model(&self) -> &Path {
        &self.config.model_path
    }

    /// Build the command line for one transcription
    fn build_command(&self, audio_path: &Path, language: Option<&str>) -> Command {
        let mut cmd = Command::new(self.executable());
        cmd.arg("-m")
            .arg(self.model())
            .arg("-f")
            .arg(audio_path)
            .arg("--output-txt")
            .arg("--no-timestamps")
            .arg("-t")
            .arg(self.config.threads.to_string());

        if let Some(lang) = language.or(self.config.default_language.as_deref()) {
            cmd.arg("-l").arg(lang);
        }

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd
    }

    #[instrument(skip(self, audio_path), fields(model = %self.model().display()))]
    async fn run_whisper(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<String, SpeechError> {
        let mut cmd = self.build_command(audio_path, language);
        debug!(command = ?cmd, "Running whisper.cpp");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "whisper.cpp not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::TranscriptionFailed(format!("Failed to run whisper.cpp: {e}"))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::TranscriptionFailed(format!(
                "whisper.cpp exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // whisper.cpp appends ".txt" to the full input file name
        let mut txt_path = audio_path.as_os_str().to_owned();
        txt_path.push(".txt");
        let text = tokio::fs::read_to_string(&txt_path).await.map_err(|e| {
            SpeechError::TranscriptionFailed(format!("Failed to read transcription output: {e}"))
        })?;

        if let Err(e) = tokio::fs::remove_file(&txt_path).await {
            warn!(error = %e, "Could not remove whisper.cpp output file");
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl SpeechToText for WhisperCppProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), language = %language))]
    async fn transcribe_with_language(
        &self,
        audio: AudioData,
        language: &str,
    ) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }
        if audio.format() != AudioFormat::Wav {
            return Err(SpeechError::InvalidAudio(format!(
                "whisper.cpp needs WAV input, got {:?}",
                audio.format()
            )));
        }

        let temp_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::TranscriptionFailed(format!("Failed to create temp file: {e}"))
        })?;
        tokio::fs::write(temp_file.path(), audio.data())
            .await
            .map_err(|e| {
                SpeechError::TranscriptionFailed(format!("Failed to write audio data: {e}"))
            })?;

        let lang = (!language.is_empty()).then_some(language);
        let text = self.run_whisper(temp_file.path(), lang).await?;

        if text.is_empty() {
            debug!("whisper.cpp returned empty transcription");
        }

        let mut transcription = Transcription::new(text);
        if let Some(lang) = lang {
            transcription = transcription.with_language(lang);
        }
        if let Some(duration_ms) = audio.duration_ms() {
            transcription = transcription.with_duration(duration_ms);
        }
        Ok(transcription)
    }

    fn model_name(&self) -> &str {
        self.model()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("whisper.cpp")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn test_config() -> LocalSttConfig {
        LocalSttConfig {
            executable_path: PathBuf::from("whisper-cpp"),
            model_path: PathBuf::from("/models/ggml-base.bin"),
            threads: 4,
            default_language: Some("en".to_string()),
        }
    }

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn model_name_extracts_from_path() {
        let provider = WhisperCppProvider::new(test_config()).unwrap();
        assert_eq!(provider.model_name(), "ggml-base");
    }

    #[test]
    fn command_uses_explicit_language() {
        let provider = WhisperCppProvider::new(test_config()).unwrap();
        let args = args_of(&provider.build_command(Path::new("/tmp/q.wav"), Some("fr")));
        assert!(args.windows(2).any(|w| w == ["-l", "fr"]));
        assert!(args.windows(2).any(|w| w == ["-f", "/tmp/q.wav"]));
        assert!(args.windows(2).any(|w| w == ["-t", "4"]));
    }

    #[test]
    fn command_falls_back_to_default_language() {
        let provider = WhisperCppProvider::new(test_config()).unwrap();
        let args = args_of(&provider.build_command(Path::new("/tmp/q.wav"), None));
        assert!(args.windows(2).any(|w| w == ["-l", "en"]));
    }

    #[tokio::test]
    async fn rejects_non_wav_audio() {
        let provider = WhisperCppProvider::new(test_config()).unwrap();
        let result = provider
            .transcribe_with_language(AudioData::new(vec![1, 2], AudioFormat::Mp3), "en")
            .await;
        assert!(matches!(result, Err(SpeechError::InvalidAudio(_))));
    }

    #[tokio::test]
    async fn missing_executable_is_not_available() {
        let mut config = test_config();
        config.executable_path = PathBuf::from("/nonexistent/whisper-cpp");
        let provider = WhisperCppProvider::new(config).unwrap();

        let result = provider
            .transcribe_with_language(AudioData::new(vec![1, 2], AudioFormat::Wav), "en")
            .await;
        assert!(matches!(result, Err(SpeechError::NotAvailable(_))));
    }
}
