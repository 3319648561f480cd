//! Speech adapter - Implements SpeechPort using ai_speech crate
//!
//! Transcription goes through the configured STT provider; speaking
//! synthesizes WAV and plays it through the output device.

use std::sync::Arc;

use ai_speech::{
    AudioData, AudioDeviceConfig, AudioFormat, AudioPlayer, OpenAISpeechProvider, PiperProvider,
    SpeechConfig, SpeechError, SpeechProvider, SpeechToText, TextToSpeech, WhisperCppProvider,
    player_for,
};
use application::error::ApplicationError;
use application::ports::{CapturedAudio, SpeechPort};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter for speech services using ai_speech crate
pub struct SpeechAdapter {
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    player: Arc<dyn AudioPlayer>,
    language: String,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("stt_model", &self.stt.model_name())
            .field("tts_model", &self.tts.model_name())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl SpeechAdapter {
    /// Build providers for the configured backend
    ///
    /// # Errors
    ///
    /// Returns an error if a provider rejects its configuration.
    pub fn from_config(
        config: &SpeechConfig,
        devices: &AudioDeviceConfig,
    ) -> Result<Self, ApplicationError> {
        let (stt, tts): (Arc<dyn SpeechToText>, Arc<dyn TextToSpeech>) = match config.provider {
            SpeechProvider::OpenAI => {
                let provider =
                    Arc::new(OpenAISpeechProvider::new(config.clone()).map_err(Self::map_error)?);
                (
                    Arc::clone(&provider) as Arc<dyn SpeechToText>,
                    provider as Arc<dyn TextToSpeech>,
                )
            },
            SpeechProvider::Local => {
                let stt = WhisperCppProvider::new(config.local_stt.clone())
                    .map_err(Self::map_error)?;
                let tts = PiperProvider::new(config.local_tts.clone()).map_err(Self::map_error)?;
                (
                    Arc::new(stt) as Arc<dyn SpeechToText>,
                    Arc::new(tts) as Arc<dyn TextToSpeech>,
                )
            },
        };

        let player = player_for(devices).map_err(Self::map_error)?;
        Ok(Self::new(stt, tts, player, config.language.clone()))
    }

    /// Assemble from explicit parts
    #[must_use]
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        player: Arc<dyn AudioPlayer>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            stt,
            tts,
            player,
            language: language.into(),
        }
    }

    /// Map speech error to application error
    fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            SpeechError::RateLimited => ApplicationError::RateLimited,
            SpeechError::CaptureFailed(e) => ApplicationError::Capture(e),
            SpeechError::ConnectionFailed(e)
            | SpeechError::RequestFailed(e)
            | SpeechError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            other => ApplicationError::Speech(other.to_string()),
        }
    }
}

#[async_trait]
impl SpeechPort for SpeechAdapter {
    #[instrument(skip(self, audio), fields(data_size = audio.wav.len()))]
    async fn transcribe(&self, audio: CapturedAudio) -> Result<String, ApplicationError> {
        let mut data = AudioData::new(audio.wav, AudioFormat::Wav);
        if let Some(rate) = audio.sample_rate {
            data = data.with_sample_rate(rate);
        }
        if let Some(duration_ms) = audio.duration_ms {
            data = data.with_duration(duration_ms);
        }

        let transcription = self
            .stt
            .transcribe_with_language(data, &self.language)
            .await
            .map_err(Self::map_error)?;

        debug!(
            text_len = transcription.text.len(),
            language = ?transcription.language,
            "Transcription complete"
        );

        Ok(transcription.text.trim().to_string())
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn speak(&self, text: &str) -> Result<(), ApplicationError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let audio = self
            .tts
            .synthesize(text, None)
            .await
            .map_err(Self::map_error)?;
        debug!(audio_size = audio.size_bytes(), "Synthesis complete");

        self.player.play(&audio).await.map_err(Self::map_error)
    }
}
