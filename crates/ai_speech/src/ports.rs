//! Port definitions for speech processing
//!
//! Defines the traits (ports) that capture, speech and playback adapters implement.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription};

/// Port for Speech-to-Text (STT) implementations
///
/// # Example
///
/// ```ignore
/// use ai_speech::{SpeechToText, AudioData};
///
/// async fn question_text(stt: &impl SpeechToText, clip: AudioData) -> Result<String, SpeechError> {
///     Ok(stt.transcribe_with_language(clip, "en").await?.text)
/// }
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio with a language hint (ISO 639-1, e.g. "en")
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the provider cannot be reached or rejects the audio.
    async fn transcribe_with_language(
        &self,
        audio: AudioData,
        language: &str,
    ) -> Result<Transcription, SpeechError>;

    /// Name of the STT model in use
    fn model_name(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// `voice` selects a provider voice; `None` uses the configured default.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError>;

    /// Name of the TTS model in use
    fn model_name(&self) -> &str;
}

/// Port for capturing a clip from the microphone
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Record for at most `window`
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::CaptureFailed` or `SpeechError::NotAvailable`
    /// when the device or recorder tool cannot be used, and `SpeechError::Timeout`
    /// when the recorder overruns the window.
    async fn record(&self, window: Duration) -> Result<AudioData, SpeechError>;
}

/// Port for playing audio on the speakers
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play a clip to completion
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::PlaybackFailed` or `SpeechError::NotAvailable`.
    async fn play(&self, audio: &AudioData) -> Result<(), SpeechError>;
}
