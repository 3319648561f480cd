//! Application state shared across handlers

use std::sync::Arc;

use application::{VoiceAssistantService, WeatherService};
use infrastructure::{AppConfig, TemplateEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Weather snapshot and on-demand refresh
    pub weather: Arc<WeatherService>,
    /// Voice assistant, `None` when speech is not configured
    pub voice: Option<Arc<VoiceAssistantService>>,
    /// Dashboard renderer
    pub templates: TemplateEngine,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
