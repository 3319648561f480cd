//! Errors crossing the port boundary

use domain::DomainError;
use thiserror::Error;

/// Failure reported by a port adapter
///
/// Adapters collapse their client-specific errors into these variants so
/// services can decide whether to keep the old snapshot, apologise or retry.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Provider payload failed domain validation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Remote provider unreachable, down, or answering with an error envelope
    #[error("External service error: {0}")]
    ExternalService(String),

    /// STT or TTS provider failure
    #[error("Speech service error: {0}")]
    Speech(String),

    #[error("Audio capture failed: {0}")]
    Capture(String),

    #[error("Provider rate limit hit")]
    RateLimited,

    /// Missing API key, unknown city or unusable provider settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Worth trying again on the next refresh tick
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ExternalService(_) | Self::Speech(_)
        )
    }
}
