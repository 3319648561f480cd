//! Voice assistant service
//!
//! Runs one listen cycle at a time: say a prompt, record a question,
//! transcribe it, answer it from the current snapshot and speak the answer.
//! A second request while a cycle is running is turned away immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::query_responder::QueryResponder;
use super::weather_snapshot::SnapshotStore;
use crate::ports::{AudioCapturePort, SpeechPort};

/// Spoken before recording starts
pub const LISTENING_PROMPT: &str = "I'm listening. What would you like to know about the weather?";

/// Spoken when the recording held nothing intelligible
pub const NOT_CAUGHT_PROMPT: &str = "I didn't catch that. Please try again.";

const BUSY_MESSAGE: &str = "Voice assistant is already listening. Please wait.";
const UNINTELLIGIBLE_MESSAGE: &str = "I couldn't understand what you said. Please try again.";
const SERVICE_ERROR_MESSAGE: &str = "There was an error with the speech recognition service.";

/// Result of one listen cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// A question was recognised and answered
    Answered { query: String, response: String },
    /// Another cycle was already running
    Busy,
    /// Nothing intelligible was recognised
    Unintelligible,
    /// The recognition service failed
    ServiceUnavailable,
    /// Recording failed
    Failed(String),
}

impl VoiceOutcome {
    /// Text returned to the caller
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Answered { query, response } => {
                format!("You asked: \"{query}\"\nResponse: {response}")
            },
            Self::Busy => BUSY_MESSAGE.to_string(),
            Self::Unintelligible => UNINTELLIGIBLE_MESSAGE.to_string(),
            Self::ServiceUnavailable => SERVICE_ERROR_MESSAGE.to_string(),
            Self::Failed(details) => format!("Error: {details}"),
        }
    }
}

/// Clears the listening flag when a cycle ends, however it ends
struct ListeningGuard<'a>(&'a AtomicBool);

impl<'a> ListeningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ListeningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Voice question/answer service
pub struct VoiceAssistantService {
    capture: Arc<dyn AudioCapturePort>,
    speech: Arc<dyn SpeechPort>,
    store: Arc<SnapshotStore>,
    responder: QueryResponder,
    listen_window: Duration,
    listening: AtomicBool,
}

impl std::fmt::Debug for VoiceAssistantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceAssistantService")
            .field("listen_window", &self.listen_window)
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

impl VoiceAssistantService {
    /// Default time to wait for a question
    pub const DEFAULT_LISTEN_WINDOW: Duration = Duration::from_secs(5);

    #[must_use]
    pub fn new(
        capture: Arc<dyn AudioCapturePort>,
        speech: Arc<dyn SpeechPort>,
        store: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            capture,
            speech,
            store,
            responder: QueryResponder::new(),
            listen_window: Self::DEFAULT_LISTEN_WINDOW,
            listening: AtomicBool::new(false),
        }
    }

    /// Override how long to listen for a question
    #[must_use]
    pub const fn with_listen_window(mut self, window: Duration) -> Self {
        self.listen_window = window;
        self
    }

    /// Whether a listen cycle is in progress
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    /// Answer a typed question from the current snapshot
    #[must_use]
    pub fn answer(&self, query: &str) -> String {
        let snapshot = self.store.load();
        self.responder
            .respond(query, snapshot.as_ref().map(|s| &s.reading))
    }

    /// Run one full listen cycle
    #[instrument(skip(self))]
    pub async fn listen(&self) -> VoiceOutcome {
        let Some(_guard) = ListeningGuard::acquire(&self.listening) else {
            info!("Listen request rejected, already listening");
            return VoiceOutcome::Busy;
        };

        self.say(LISTENING_PROMPT).await;

        let audio = match self.capture.capture(self.listen_window).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!(error = %e, "Audio capture failed");
                return VoiceOutcome::Failed(e.to_string());
            },
        };
        debug!(bytes = audio.wav.len(), "Captured question");

        let text = match self.speech.transcribe(audio).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Speech recognition failed");
                self.say(SERVICE_ERROR_MESSAGE).await;
                return VoiceOutcome::ServiceUnavailable;
            },
        };

        let query = text.trim();
        if query.is_empty() {
            info!("Nothing intelligible recognised");
            self.say(NOT_CAUGHT_PROMPT).await;
            return VoiceOutcome::Unintelligible;
        }

        let response = self.answer(query);
        info!(
            query = %query,
            topic = ?self.responder.classify(query),
            "Answered voice question"
        );
        self.say(&response).await;

        VoiceOutcome::Answered {
            query: query.to_string(),
            response,
        }
    }

    /// Speak `text`, logging rather than surfacing playback failures
    async fn say(&self, text: &str) {
        if let Err(e) = self.speech.speak(text).await {
            warn!(error = %e, "Failed to speak");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use domain::{Humidity, Measurement, WeatherReading};
    use mockall::predicate::eq;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{CapturedAudio, MockAudioCapturePort, MockSpeechPort};

    fn store_with(temperature: f64, precipitation: f64) -> Arc<SnapshotStore> {
        let store = Arc::new(SnapshotStore::new());
        store.publish(
            WeatherReading::new(
                "Lyon",
                Measurement::new("temperature", temperature).unwrap(),
                Humidity::new(70).unwrap(),
                Measurement::new("wind_speed", 8.0).unwrap(),
                "Overcast",
            )
            .unwrap()
            .with_precipitation(Some(Measurement::new("precipitation", precipitation).unwrap())),
        );
        store
    }

    fn capture_ok() -> MockAudioCapturePort {
        let mut capture = MockAudioCapturePort::new();
        capture
            .expect_capture()
            .returning(|_| Ok(CapturedAudio::wav(vec![0; 44])));
        capture
    }

    fn speech_hearing(text: &'static str) -> MockSpeechPort {
        let mut speech = MockSpeechPort::new();
        speech
            .expect_transcribe()
            .returning(move |_| Ok(text.to_string()));
        speech.expect_speak().returning(|_| Ok(()));
        speech
    }

    fn service(
        capture: MockAudioCapturePort,
        speech: MockSpeechPort,
        store: Arc<SnapshotStore>,
    ) -> VoiceAssistantService {
        VoiceAssistantService::new(Arc::new(capture), Arc::new(speech), store)
    }

    // ========================================================================
    // Listen cycle
    // ========================================================================

    #[tokio::test]
    async fn answers_recognised_question() {
        let svc = service(
            capture_ok(),
            speech_hearing("what should I wear"),
            store_with(3.0, 0.4),
        );

        let outcome = svc.listen().await;

        let expected = "For today, it's very cold. I recommend wearing a thick coat, scarf, \
                        gloves, and a hat. Don't forget your umbrella, there's precipitation!";
        assert_eq!(
            outcome,
            VoiceOutcome::Answered {
                query: "what should I wear".to_string(),
                response: expected.to_string(),
            }
        );
        assert_eq!(
            outcome.message(),
            format!("You asked: \"what should I wear\"\nResponse: {expected}")
        );
        assert!(!svc.is_listening());
    }

    #[tokio::test]
    async fn speaks_prompt_then_answer() {
        let mut speech = MockSpeechPort::new();
        let mut seq = mockall::Sequence::new();
        speech
            .expect_speak()
            .with(eq(LISTENING_PROMPT))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        speech
            .expect_transcribe()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("how windy".to_string()));
        speech
            .expect_speak()
            .with(eq("The wind speed is 8.0 kilometers per hour."))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let svc = service(capture_ok(), speech, store_with(10.0, 0.0));
        assert!(matches!(svc.listen().await, VoiceOutcome::Answered { .. }));
    }

    #[tokio::test]
    async fn passes_listen_window_to_capture() {
        let mut capture = MockAudioCapturePort::new();
        capture
            .expect_capture()
            .with(eq(Duration::from_secs(3)))
            .times(1)
            .returning(|_| Ok(CapturedAudio::wav(vec![0; 44])));

        let svc = service(capture, speech_hearing("humid"), store_with(10.0, 0.0))
            .with_listen_window(Duration::from_secs(3));
        assert!(matches!(svc.listen().await, VoiceOutcome::Answered { .. }));
    }

    #[tokio::test]
    async fn empty_transcription_is_unintelligible() {
        let mut speech = MockSpeechPort::new();
        speech
            .expect_transcribe()
            .returning(|_| Ok("   ".to_string()));
        speech
            .expect_speak()
            .with(eq(LISTENING_PROMPT))
            .returning(|_| Ok(()));
        speech
            .expect_speak()
            .with(eq(NOT_CAUGHT_PROMPT))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(capture_ok(), speech, store_with(10.0, 0.0));
        let outcome = svc.listen().await;

        assert_eq!(outcome, VoiceOutcome::Unintelligible);
        assert_eq!(
            outcome.message(),
            "I couldn't understand what you said. Please try again."
        );
    }

    #[tokio::test]
    async fn recognition_failure_is_reported_and_spoken() {
        let mut speech = MockSpeechPort::new();
        speech
            .expect_transcribe()
            .returning(|_| Err(ApplicationError::Speech("503".to_string())));
        speech
            .expect_speak()
            .with(eq(LISTENING_PROMPT))
            .returning(|_| Ok(()));
        speech
            .expect_speak()
            .with(eq(SERVICE_ERROR_MESSAGE))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(capture_ok(), speech, store_with(10.0, 0.0));
        let outcome = svc.listen().await;

        assert_eq!(outcome, VoiceOutcome::ServiceUnavailable);
        assert_eq!(
            outcome.message(),
            "There was an error with the speech recognition service."
        );
        assert!(!svc.is_listening());
    }

    #[tokio::test]
    async fn capture_failure_returns_error_text() {
        let mut capture = MockAudioCapturePort::new();
        capture
            .expect_capture()
            .returning(|_| Err(ApplicationError::Capture("no microphone".to_string())));
        let mut speech = MockSpeechPort::new();
        speech.expect_transcribe().times(0);
        speech
            .expect_speak()
            .with(eq(LISTENING_PROMPT))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(capture, speech, store_with(10.0, 0.0));
        let outcome = svc.listen().await;

        assert_eq!(
            outcome.message(),
            "Error: Audio capture failed: no microphone"
        );
        assert!(!svc.is_listening());
    }

    #[tokio::test]
    async fn playback_failure_does_not_change_outcome() {
        let mut speech = MockSpeechPort::new();
        speech
            .expect_transcribe()
            .returning(|_| Ok("temperature".to_string()));
        speech
            .expect_speak()
            .returning(|_| Err(ApplicationError::Speech("no speaker".to_string())));

        let svc = service(capture_ok(), speech, store_with(21.5, 0.0));
        assert_eq!(
            svc.listen().await,
            VoiceOutcome::Answered {
                query: "temperature".to_string(),
                response: "The temperature in Lyon is 21.5°C.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn empty_snapshot_answers_no_data() {
        let svc = service(
            capture_ok(),
            speech_hearing("temperature"),
            Arc::new(SnapshotStore::new()),
        );
        match svc.listen().await {
            VoiceOutcome::Answered { response, .. } => {
                assert_eq!(response, "Sorry, I couldn't get the current weather data.");
            },
            other => panic!("Expected answer, got: {other:?}"),
        }
    }

    // ========================================================================
    // Single-flight
    // ========================================================================

    /// Capture that blocks until released
    struct GatedCapture {
        started: Arc<Notify>,
        release: Arc<Notify>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioCapturePort for GatedCapture {
        async fn capture(&self, _window: Duration) -> Result<CapturedAudio, ApplicationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            Ok(CapturedAudio::wav(vec![0; 44]))
        }
    }

    #[tokio::test]
    async fn second_request_while_listening_is_busy() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let capture = Arc::new(GatedCapture {
            started: Arc::clone(&started),
            release: Arc::clone(&release),
            calls: AtomicUsize::new(0),
        });
        let svc = Arc::new(VoiceAssistantService::new(
            Arc::clone(&capture) as Arc<dyn AudioCapturePort>,
            Arc::new(speech_hearing("wind")),
            store_with(10.0, 0.0),
        ));

        let first = tokio::spawn({
            let svc = Arc::clone(&svc);
            async move { svc.listen().await }
        });
        started.notified().await;

        assert!(svc.is_listening());
        let second = svc.listen().await;
        assert_eq!(second, VoiceOutcome::Busy);
        assert_eq!(
            second.message(),
            "Voice assistant is already listening. Please wait."
        );

        release.notify_one();
        let first = first.await.unwrap();
        assert!(matches!(first, VoiceOutcome::Answered { .. }));
        assert_eq!(capture.calls.load(Ordering::SeqCst), 1);
        assert!(!svc.is_listening());
    }

    #[tokio::test]
    async fn listening_again_after_failure() {
        let mut capture = MockAudioCapturePort::new();
        let mut seq = mockall::Sequence::new();
        capture
            .expect_capture()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ApplicationError::Capture("timed out".to_string())));
        capture
            .expect_capture()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CapturedAudio::wav(vec![0; 44])));

        let svc = service(capture, speech_hearing("rain"), store_with(10.0, 0.0));

        assert!(matches!(svc.listen().await, VoiceOutcome::Failed(_)));
        assert_eq!(
            svc.listen().await,
            VoiceOutcome::Answered {
                query: "rain".to_string(),
                response: "There is no precipitation at the moment.".to_string(),
            }
        );
    }

    #[test]
    fn answer_uses_current_snapshot() {
        let store = store_with(30.0, 0.0);
        let svc = service(
            MockAudioCapturePort::new(),
            MockSpeechPort::new(),
            Arc::clone(&store),
        );
        assert_eq!(
            svc.answer("is it hot"),
            "The temperature in Lyon is 30.0°C."
        );
    }
}
