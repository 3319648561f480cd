//! Errors raised along the capture → transcribe → speak pipeline

use thiserror::Error;

/// Ceiling reported when reqwest gives up without saying how long it waited
const HTTP_TIMEOUT_MS: u64 = 30_000;

/// Failure of one stage of a voice cycle
///
/// Device errors (`CaptureFailed`, `PlaybackFailed`, `NotAvailable`) come from
/// the local audio tools; the rest from whichever STT/TTS provider is wired in.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Audio capture failed: {0}")]
    CaptureFailed(String),

    #[error("Audio playback failed: {0}")]
    PlaybackFailed(String),

    /// External tool or provider binary is missing on this host
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// Recording was empty, truncated or in a format the provider refuses
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Provider unreachable at the socket level
    #[error("Could not reach speech provider: {0}")]
    ConnectionFailed(String),

    /// Request sent but rejected or aborted mid-flight
    #[error("Speech request failed: {0}")]
    RequestFailed(String),

    /// Provider answered with something we could not decode
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    /// Deadline hit, in milliseconds
    #[error("Speech processing timed out after {0}ms")]
    Timeout(u64),

    #[error("Speech provider rate limit hit")]
    RateLimited,

    #[error("Speech configuration error: {0}")]
    Configuration(String),

    /// Provider returned a 5xx
    #[error("Speech provider unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        match err {
            e if e.is_timeout() => Self::Timeout(HTTP_TIMEOUT_MS),
            e if e.is_connect() => Self::ConnectionFailed(e.to_string()),
            e => Self::RequestFailed(e.to_string()),
        }
    }
}
