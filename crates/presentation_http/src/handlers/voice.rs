//! Voice question endpoint

use axum::extract::State;
use tracing::debug;

use crate::state::AppState;

/// Returned when speech is not configured
pub const VOICE_DISABLED: &str = "Voice assistant is not available.";

/// `GET /api/voice-recognition`
///
/// Runs one listen cycle and returns its outcome as plain text. Busy and
/// error outcomes are ordinary responses, not HTTP errors.
pub async fn voice_recognition(State(state): State<AppState>) -> String {
    let Some(voice) = state.voice.as_ref() else {
        debug!("Voice request while voice assistant is disabled");
        return VOICE_DISABLED.to_string();
    };

    voice.listen().await.message()
}
