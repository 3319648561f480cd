//! OpenAI-compatible speech provider
//!
//! Implements `SpeechToText` against `/audio/transcriptions` and `TextToSpeech`
//! against `/audio/speech`. Any server speaking the same protocol works when
//! `openai_base_url` points at it.
//!
//! Synthesis always requests WAV so the result can go straight to the player.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioData, AudioFormat, Transcription};

/// OpenAI TTS input limit in characters
const MAX_TTS_CHARS: usize = 4096;

/// OpenAI-compatible speech provider implementing both STT and TTS
#[derive(Debug, Clone)]
pub struct OpenAISpeechProvider {
    client: Client,
    config: SpeechConfig,
}

impl OpenAISpeechProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config
            .openai_api_key
            .as_ref()
            .map_or("", ExposeSecret::expose_secret)
    }

    fn stt_url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.openai_base_url)
    }

    fn tts_url(&self) -> String {
        format!("{}/audio/speech", self.config.openai_base_url)
    }

    /// Map a non-success response to a `SpeechError`
    fn map_error_response(
        status: StatusCode,
        body: &str,
        model: &str,
        failure: fn(String) -> SpeechError,
    ) -> SpeechError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return SpeechError::RateLimited;
        }

        if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
            return match api_error.error.code.as_deref() {
                Some("rate_limit_exceeded") => SpeechError::RateLimited,
                Some("model_not_found") => {
                    SpeechError::Configuration(format!("Model not available: {model}"))
                },
                _ if status.is_server_error() => {
                    SpeechError::ServiceUnavailable(api_error.error.message)
                },
                _ => failure(api_error.error.message),
            };
        }

        if status.is_server_error() {
            SpeechError::ServiceUnavailable(format!("HTTP {status}"))
        } else {
            failure(format!("HTTP {status}: {body}"))
        }
    }
}

/// Transcription response body
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

/// API error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[async_trait]
impl SpeechToText for OpenAISpeechProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), language = %language))]
    async fn transcribe_with_language(
        &self,
        audio: AudioData,
        language: &str,
    ) -> Result<Transcription, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        let format = audio.format();
        let filename = format!("question.{}", format.extension());
        let mime_type = format.mime_type();
        let data = audio.into_data();

        let file_part = Part::bytes(data)
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.stt_model.clone());
        if !language.is_empty() {
            form = form.text("language", language.to_string());
        }

        let response = self
            .client
            .post(self.stt_url())
            .bearer_auth(self.api_key())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::map_error_response(
                status,
                &error_body,
                &self.config.stt_model,
                SpeechError::TranscriptionFailed,
            ));
        }

        let whisper_response: WhisperResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(text_len = whisper_response.text.len(), "Transcription complete");

        let language = whisper_response
            .language
            .unwrap_or_else(|| language.to_string());
        let mut transcription = Transcription::new(whisper_response.text.trim());
        if !language.is_empty() {
            transcription = transcription.with_language(language);
        }

        if let Some(duration) = whisper_response.duration {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_ms = (duration * 1000.0) as u64;
            transcription = transcription.with_duration(duration_ms);
        }

        Ok(transcription)
    }

    fn model_name(&self) -> &str {
        &self.config.stt_model
    }
}

#[async_trait]
impl TextToSpeech for OpenAISpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioData, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_TTS_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: exceeds {MAX_TTS_CHARS} character limit"
            )));
        }

        let voice = voice.unwrap_or(&self.config.default_voice);
        let request = TtsRequest {
            model: &self.config.tts_model,
            input: text,
            voice,
            response_format: AudioFormat::Wav.extension(),
            speed: if (self.config.speed - 1.0).abs() < f32::EPSILON {
                None
            } else {
                Some(self.config.speed)
            },
        };

        let response = self
            .client
            .post(self.tts_url())
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::map_error_response(
                status,
                &error_body,
                &self.config.tts_model,
                SpeechError::SynthesisFailed,
            ));
        }

        let audio_bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        let format = AudioFormat::sniff(&audio_bytes).ok_or_else(|| {
            SpeechError::InvalidResponse("Speech endpoint returned unrecognised audio".to_string())
        })?;
        if format != AudioFormat::Wav {
            warn!(?format, "Speech endpoint ignored the requested WAV format");
        }

        debug!(audio_size = audio_bytes.len(), ?format, "Speech synthesis complete");

        Ok(AudioData::new(audio_bytes.to_vec(), format))
    }

    fn model_name(&self) -> &str {
        &self.config.tts_model
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(mock_server: &MockServer) -> OpenAISpeechProvider {
        let config = SpeechConfig {
            openai_api_key: Some(SecretString::from("test-api-key".to_string())),
            openai_base_url: mock_server.uri(),
            ..Default::default()
        };
        OpenAISpeechProvider::new(config).unwrap()
    }

    const WAV_HEADER: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

    fn wav_clip() -> AudioData {
        AudioData::new(WAV_HEADER.to_vec(), AudioFormat::Wav)
    }

    mod stt_tests {
        use super::*;

        #[tokio::test]
        async fn transcribe_success() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/transcriptions"))
                .and(header("authorization", "Bearer test-api-key"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "text": " What should I wear today? ",
                    "language": "en",
                    "duration": 2.5
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let transcription = provider
                .transcribe_with_language(wav_clip(), "en")
                .await
                .unwrap();

            assert_eq!(transcription.text, "What should I wear today?");
            assert_eq!(transcription.language.as_deref(), Some("en"));
            assert_eq!(transcription.duration_ms, Some(2500));
        }

        #[tokio::test]
        async fn transcribe_empty_text_is_returned_as_empty() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/transcriptions"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": ""})),
                )
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let transcription = provider
                .transcribe_with_language(wav_clip(), "en")
                .await
                .unwrap();

            assert!(transcription.is_empty());
        }

        #[tokio::test]
        async fn transcribe_empty_audio_fails() {
            let mock_server = MockServer::start().await;
            let provider = create_test_provider(&mock_server);

            let result = provider
                .transcribe_with_language(AudioData::new(vec![], AudioFormat::Wav), "en")
                .await;

            assert!(matches!(result, Err(SpeechError::InvalidAudio(_))));
        }

        #[tokio::test]
        async fn transcribe_rate_limited() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/transcriptions"))
                .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                    "error": {
                        "message": "Rate limit exceeded",
                        "type": "rate_limit_error",
                        "code": "rate_limit_exceeded"
                    }
                })))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let result = provider.transcribe_with_language(wav_clip(), "en").await;

            assert!(matches!(result, Err(SpeechError::RateLimited)));
        }

        #[tokio::test]
        async fn transcribe_server_error_is_service_unavailable() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/transcriptions"))
                .respond_with(ResponseTemplate::new(503).set_body_string("down"))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let result = provider.transcribe_with_language(wav_clip(), "en").await;

            assert!(matches!(result, Err(SpeechError::ServiceUnavailable(_))));
        }

        #[tokio::test]
        async fn transcribe_bad_request_is_transcription_failure() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/transcriptions"))
                .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                    "error": {"message": "Invalid file format.", "code": null}
                })))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let result = provider.transcribe_with_language(wav_clip(), "en").await;

            match result {
                Err(SpeechError::TranscriptionFailed(message)) => {
                    assert_eq!(message, "Invalid file format.");
                },
                other => panic!("Expected TranscriptionFailed, got: {other:?}"),
            }
        }
    }

    mod tts_tests {
        use super::*;

        #[tokio::test]
        async fn synthesize_requests_wav() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .and(body_partial_json(serde_json::json!({
                    "model": "tts-1",
                    "voice": "nova",
                    "response_format": "wav"
                })))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(WAV_HEADER.to_vec()))
                .expect(1)
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let audio = provider.synthesize("It's nice.", None).await.unwrap();

            assert_eq!(audio.format(), AudioFormat::Wav);
            assert_eq!(audio.data(), WAV_HEADER);
        }

        #[tokio::test]
        async fn synthesize_with_voice() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .and(body_partial_json(serde_json::json!({"voice": "alloy"})))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(WAV_HEADER.to_vec()))
                .expect(1)
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            assert!(provider.synthesize("Hello", Some("alloy")).await.is_ok());
        }

        #[tokio::test]
        async fn mp3_reply_is_labelled_mp3() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_bytes(b"ID3\x04\x00\x00frames".to_vec()),
                )
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let audio = provider.synthesize("Hello", None).await.unwrap();
            assert_eq!(audio.format(), AudioFormat::Mp3);
        }

        #[tokio::test]
        async fn unrecognised_reply_is_invalid_response() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/audio/speech"))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 8]))
                .mount(&mock_server)
                .await;

            let provider = create_test_provider(&mock_server);
            let result = provider.synthesize("Hello", None).await;
            assert!(matches!(result, Err(SpeechError::InvalidResponse(_))));
        }

        #[tokio::test]
        async fn synthesize_empty_text_fails() {
            let mock_server = MockServer::start().await;
            let provider = create_test_provider(&mock_server);

            let result = provider.synthesize("   ", None).await;
            assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
        }

        #[tokio::test]
        async fn synthesize_text_too_long_fails() {
            let mock_server = MockServer::start().await;
            let provider = create_test_provider(&mock_server);

            let text = "a".repeat(MAX_TTS_CHARS + 1);
            let result = provider.synthesize(&text, None).await;
            assert!(matches!(result, Err(SpeechError::SynthesisFailed(_))));
        }
    }

    #[test]
    fn model_names_are_correct() {
        let config = SpeechConfig {
            openai_api_key: Some(SecretString::from("k".to_string())),
            ..Default::default()
        };
        let provider = OpenAISpeechProvider::new(config).unwrap();
        assert_eq!(SpeechToText::model_name(&provider), "whisper-1");
        assert_eq!(TextToSpeech::model_name(&provider), "tts-1");
    }

    #[test]
    fn new_fails_without_api_key() {
        let result = OpenAISpeechProvider::new(SpeechConfig::default());
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }
}
