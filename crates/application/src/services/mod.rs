//! Application services

mod query_responder;
mod voice_assistant_service;
mod weather_service;
mod weather_snapshot;

pub use query_responder::{NO_DATA_RESPONSE, QueryResponder, ResponseTopic};
pub use voice_assistant_service::{
    LISTENING_PROMPT, NOT_CAUGHT_PROMPT, VoiceAssistantService, VoiceOutcome,
};
pub use weather_service::WeatherService;
pub use weather_snapshot::{SnapshotStore, WeatherSnapshot};
