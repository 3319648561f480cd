//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer and owns configuration
//! loading, logging setup and dashboard rendering.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod templates;

pub use adapters::*;
pub use config::{AppConfig, LogFormat, LoggingConfig, ServerConfig, WeatherAppConfig};
pub use telemetry::{TelemetryError, init_logging};
pub use templates::{DashboardView, ReadingView, TemplateEngine, TemplateError};
