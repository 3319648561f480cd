//! Configuration for speech processing and audio devices

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Configuration for the speech-to-text and text-to-speech services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Speech provider to use
    #[serde(default)]
    pub provider: SpeechProvider,

    /// API key for the OpenAI-compatible provider; redacted in `Debug`, never serialized
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<SecretString>,

    /// API base URL for the OpenAI-compatible provider
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Text-to-speech model
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Default voice for TTS
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TTS speaking speed (0.25 to 4.0)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Recognition language hint (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,

    /// whisper.cpp settings, used by the local provider
    #[serde(default)]
    pub local_stt: LocalSttConfig,

    /// Piper settings, used by the local provider
    #[serde(default)]
    pub local_tts: LocalTtsConfig,
}

/// Speech provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    /// OpenAI-compatible HTTP API
    #[default]
    OpenAI,
    /// whisper.cpp + Piper on this machine
    Local,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_voice() -> String {
    "nova".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000
}

const fn default_speed() -> f32 {
    1.0
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            default_voice: default_voice(),
            timeout_ms: default_timeout_ms(),
            speed: default_speed(),
            language: default_language(),
            local_stt: LocalSttConfig::default(),
            local_tts: LocalTtsConfig::default(),
        }
    }
}

impl SpeechConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        match self.provider {
            SpeechProvider::OpenAI => {
                if self
                    .openai_api_key
                    .as_ref()
                    .is_none_or(|key| key.expose_secret().is_empty())
                {
                    return Err("OpenAI API key is required for OpenAI provider".to_string());
                }
                if !(0.25..=4.0).contains(&self.speed) {
                    return Err(format!(
                        "Speed must be between 0.25 and 4.0, got {}",
                        self.speed
                    ));
                }
                if self.timeout_ms == 0 {
                    return Err("Timeout must be greater than 0".to_string());
                }
            },
            SpeechProvider::Local => {
                self.local_stt.validate()?;
                self.local_tts.validate()?;
            },
        }

        if self.language.trim().is_empty() {
            return Err("Language must not be empty".to_string());
        }

        Ok(())
    }
}

/// whisper.cpp configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalSttConfig {
    /// whisper.cpp CLI executable
    #[serde(default = "default_whisper_executable")]
    pub executable_path: PathBuf,

    /// GGML model file
    #[serde(default = "default_whisper_model")]
    pub model_path: PathBuf,

    /// Worker threads
    #[serde(default = "default_threads")]
    pub threads: u16,

    /// Language passed with `-l` when the caller gives none
    #[serde(default)]
    pub default_language: Option<String>,
}

fn default_whisper_executable() -> PathBuf {
    PathBuf::from("whisper-cpp")
}

fn default_whisper_model() -> PathBuf {
    PathBuf::from("models/ggml-base.en.bin")
}

const fn default_threads() -> u16 {
    4
}

impl Default for LocalSttConfig {
    fn default() -> Self {
        Self {
            executable_path: default_whisper_executable(),
            model_path: default_whisper_model(),
            threads: default_threads(),
            default_language: None,
        }
    }
}

impl LocalSttConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("whisper.cpp executable path must not be empty".to_string());
        }
        if self.model_path.as_os_str().is_empty() {
            return Err("whisper.cpp model path must not be empty".to_string());
        }
        if self.threads == 0 {
            return Err("whisper.cpp threads must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Piper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTtsConfig {
    /// Piper CLI executable
    #[serde(default = "default_piper_executable")]
    pub executable_path: PathBuf,

    /// ONNX voice model used when no named voice matches
    #[serde(default = "default_piper_model")]
    pub default_model_path: PathBuf,

    /// Voice name used when the caller gives none
    #[serde(default = "default_piper_voice")]
    pub default_voice: String,

    /// Named voices mapped to their ONNX models
    #[serde(default)]
    pub voices: HashMap<String, PathBuf>,

    /// Speaking rate; larger is slower
    #[serde(default = "default_length_scale")]
    pub length_scale: f32,

    /// Seconds of silence between sentences
    #[serde(default = "default_sentence_silence")]
    pub sentence_silence: f32,
}

fn default_piper_executable() -> PathBuf {
    PathBuf::from("piper")
}

fn default_piper_model() -> PathBuf {
    PathBuf::from("voices/en_US-lessac-medium.onnx")
}

fn default_piper_voice() -> String {
    "en_US-lessac-medium".to_string()
}

const fn default_length_scale() -> f32 {
    1.0
}

const fn default_sentence_silence() -> f32 {
    0.2
}

impl Default for LocalTtsConfig {
    fn default() -> Self {
        Self {
            executable_path: default_piper_executable(),
            default_model_path: default_piper_model(),
            default_voice: default_piper_voice(),
            voices: HashMap::new(),
            length_scale: default_length_scale(),
            sentence_silence: default_sentence_silence(),
        }
    }
}

impl LocalTtsConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("Piper executable path must not be empty".to_string());
        }
        if self.length_scale <= 0.0 {
            return Err(format!(
                "Piper length scale must be positive, got {}",
                self.length_scale
            ));
        }
        if self.sentence_silence < 0.0 {
            return Err("Piper sentence silence must not be negative".to_string());
        }
        Ok(())
    }
}

/// Which audio stack opens the microphone and speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackend {
    /// Native host audio through cpal (ALSA, CoreAudio or WASAPI)
    #[default]
    Cpal,
    /// The `arecord` / `aplay` command-line tools
    Alsa,
}

/// Microphone and speaker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDeviceConfig {
    /// Audio stack used for capture and playback
    #[serde(default)]
    pub backend: AudioBackend,

    /// Recorder executable for the `alsa` backend
    #[serde(default = "default_recorder")]
    pub recorder_path: PathBuf,

    /// Player executable for the `alsa` backend
    #[serde(default = "default_player")]
    pub player_path: PathBuf,

    /// Capture device: a cpal device name, or an ALSA name such as
    /// `plughw:1,0` for the `alsa` backend; system default when unset
    #[serde(default)]
    pub input_device: Option<String>,

    /// Playback device, named as for `input_device`; system default when unset
    #[serde(default)]
    pub output_device: Option<String>,

    /// Capture sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Listen window per question, in seconds
    #[serde(default = "default_listen_timeout_secs")]
    pub listen_timeout_secs: u64,

    /// Extra time granted to capture and playback before they are cut off
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
}

fn default_recorder() -> PathBuf {
    PathBuf::from("arecord")
}

fn default_player() -> PathBuf {
    PathBuf::from("aplay")
}

const fn default_sample_rate() -> u32 {
    16_000
}

const fn default_listen_timeout_secs() -> u64 {
    5
}

const fn default_grace_secs() -> u64 {
    2
}

impl Default for AudioDeviceConfig {
    fn default() -> Self {
        Self {
            backend: AudioBackend::default(),
            recorder_path: default_recorder(),
            player_path: default_player(),
            input_device: None,
            output_device: None,
            sample_rate: default_sample_rate(),
            listen_timeout_secs: default_listen_timeout_secs(),
            grace_secs: default_grace_secs(),
        }
    }
}

impl AudioDeviceConfig {
    /// Listen window as a duration
    #[must_use]
    pub const fn listen_timeout(&self) -> Duration {
        Duration::from_secs(self.listen_timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_timeout_secs == 0 {
            return Err("Listen timeout must be greater than 0".to_string());
        }
        if !(8_000..=48_000).contains(&self.sample_rate) {
            return Err(format!(
                "Sample rate must be between 8000 and 48000 Hz, got {}",
                self.sample_rate
            ));
        }
        Ok(())
    }
}
