//! AI Speech - microphone capture, STT, TTS and playback
//!
//! Provides traits and implementations for one spoken exchange:
//! - `AudioRecorder` - Capture a bounded clip from the microphone
//! - `SpeechToText` - Transcribe audio to text (STT)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//! - `AudioPlayer` - Play synthesized audio on the speakers
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains the STT/TTS implementations
//! - `audio` module contains the device-facing recorder and player
//!
//! # Supported Providers
//!
//! - OpenAI-compatible `/audio/transcriptions` and `/audio/speech` endpoints
//! - Local whisper.cpp (STT) and Piper (TTS)
//! - cpal for capture and playback (default `cpal` feature)
//! - ALSA `arecord` / `aplay` as the fallback audio backend
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AudioRecorder, OpenAISpeechProvider, SpeechToText, recorder_for};
//!
//! let recorder = recorder_for(&device_config)?;
//! let provider = OpenAISpeechProvider::new(speech_config)?;
//!
//! let clip = recorder.record(Duration::from_secs(5)).await?;
//! let transcription = provider.transcribe_with_language(clip, "en").await?;
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use audio::{AplayPlayer, ArecordRecorder, player_for, recorder_for};
#[cfg(feature = "cpal")]
pub use audio::{CpalPlayer, CpalRecorder};
pub use config::{
    AudioBackend, AudioDeviceConfig, LocalSttConfig, LocalTtsConfig, SpeechConfig, SpeechProvider,
};
pub use error::SpeechError;
pub use ports::{AudioPlayer, AudioRecorder, SpeechToText, TextToSpeech};
pub use providers::openai::OpenAISpeechProvider;
pub use providers::piper::PiperProvider;
pub use providers::whisper_cpp::WhisperCppProvider;
pub use types::{AudioData, AudioFormat, Transcription};
