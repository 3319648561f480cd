//! Device-facing audio adapters
//!
//! The default backend opens the microphone and speaker through cpal and
//! encodes clips with hound. The `alsa` backend shells out to `arecord` and
//! `aplay` instead, the same way the local speech providers shell out to
//! whisper.cpp and Piper; it stays available for hosts where cpal cannot
//! open the device, and is the only backend without the `cpal` feature.

mod aplay;
mod arecord;
#[cfg(feature = "cpal")]
mod cpal_capture;
#[cfg(feature = "cpal")]
mod cpal_playback;
#[cfg(feature = "cpal")]
mod device;
#[cfg(feature = "cpal")]
mod resample;
pub mod wav;

use std::sync::Arc;
use std::time::Duration;

pub use aplay::AplayPlayer;
pub use arecord::ArecordRecorder;
#[cfg(feature = "cpal")]
pub use cpal_capture::CpalRecorder;
#[cfg(feature = "cpal")]
pub use cpal_playback::CpalPlayer;

use crate::config::{AudioBackend, AudioDeviceConfig};
use crate::error::SpeechError;
use crate::ports::{AudioPlayer, AudioRecorder};

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Build the recorder for the configured backend
///
/// # Errors
///
/// Returns `SpeechError::Configuration` for invalid device settings, or
/// `SpeechError::NotAvailable` when the backend was compiled out.
pub fn recorder_for(config: &AudioDeviceConfig) -> Result<Arc<dyn AudioRecorder>, SpeechError> {
    match config.backend {
        #[cfg(feature = "cpal")]
        AudioBackend::Cpal => Ok(Arc::new(CpalRecorder::new(config.clone())?)),
        #[cfg(not(feature = "cpal"))]
        AudioBackend::Cpal => Err(compiled_out()),
        AudioBackend::Alsa => Ok(Arc::new(ArecordRecorder::new(config.clone())?)),
    }
}

/// Build the player for the configured backend
///
/// # Errors
///
/// Returns `SpeechError::NotAvailable` when the backend was compiled out.
pub fn player_for(config: &AudioDeviceConfig) -> Result<Arc<dyn AudioPlayer>, SpeechError> {
    match config.backend {
        #[cfg(feature = "cpal")]
        AudioBackend::Cpal => Ok(Arc::new(CpalPlayer::new(config.clone()))),
        #[cfg(not(feature = "cpal"))]
        AudioBackend::Cpal => Err(compiled_out()),
        AudioBackend::Alsa => Ok(Arc::new(AplayPlayer::new(config.clone()))),
    }
}

#[cfg(not(feature = "cpal"))]
fn compiled_out() -> SpeechError {
    SpeechError::NotAvailable(
        "cpal audio backend not compiled in; set backend = \"alsa\"".to_string(),
    )
}
