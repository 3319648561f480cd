//! Audio capture port - Interface for recording a spoken question

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// A WAV clip recorded from the microphone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    /// WAV bytes, header included
    pub wav: Vec<u8>,
    /// Sample rate in Hz, when known
    pub sample_rate: Option<u32>,
    /// Length of the listen window in milliseconds
    pub duration_ms: Option<u64>,
}

impl CapturedAudio {
    /// Wrap raw WAV bytes
    #[must_use]
    pub const fn wav(wav: Vec<u8>) -> Self {
        Self {
            wav,
            sample_rate: None,
            duration_ms: None,
        }
    }
}

/// Port for microphone capture
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AudioCapturePort: Send + Sync {
    /// Record one question, listening for at most `window`
    async fn capture(&self, window: Duration) -> Result<CapturedAudio, ApplicationError>;
}
