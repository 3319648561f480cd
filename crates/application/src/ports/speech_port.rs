//! Speech port - Interface for recognising questions and speaking answers

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::CapturedAudio;
use crate::error::ApplicationError;

/// Port for speech processing operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Transcribe a captured clip to text
    ///
    /// An empty string means nothing intelligible was recognised; service
    /// failures are reported as `Err`.
    async fn transcribe(&self, audio: CapturedAudio) -> Result<String, ApplicationError>;

    /// Say `text` out loud, returning once playback has finished
    async fn speak(&self, text: &str) -> Result<(), ApplicationError>;
}
