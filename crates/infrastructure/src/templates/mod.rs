//! Dashboard page rendering
//!
//! Uses the Tera templating engine with the dashboard template compiled
//! into the binary. HTML auto-escaping stays on, so provider text such as
//! the condition description is always escaped.

use std::sync::Arc;

use domain::{Measurement, WeatherReading};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(String),

    /// Template compilation failed
    #[error("Template compilation failed: {0}")]
    Compile(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(e.to_string()),
        }
    }
}

/// Embedded templates - compiled into the binary
mod embedded {
    pub const DASHBOARD: &str = include_str!("dashboard.html");
}

const DASHBOARD_TEMPLATE: &str = "dashboard.html";

/// Reading fields preformatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingView {
    pub city: String,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub precipitation: String,
}

impl ReadingView {
    #[must_use]
    pub fn from_reading(reading: &WeatherReading) -> Self {
        fn optional(value: Option<Measurement>) -> String {
            value.map_or_else(|| "None".to_string(), |m| m.to_string())
        }

        Self {
            city: reading.city().to_string(),
            temperature: reading.temperature().to_string(),
            description: reading.description().to_string(),
            humidity: reading.humidity().to_string(),
            wind_speed: reading.wind_speed().to_string(),
            pressure: optional(reading.pressure()),
            precipitation: optional(reading.precipitation()),
        }
    }
}

/// Everything the dashboard page shows
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Configured city, shown when there is no reading yet
    pub city: String,
    /// Latest reading, if any
    pub weather: Option<ReadingView>,
    /// When the reading was fetched, already formatted
    pub fetched_at: Option<String>,
    /// Whether the voice button is usable
    pub voice_enabled: bool,
    /// Page auto-reload period in milliseconds
    pub reload_interval_ms: u64,
}

/// Template engine using Tera
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Arc<Tera>,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field(
                "templates",
                &self.tera.get_template_names().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TemplateEngine {
    /// Compile the embedded templates
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Compile` if a template does not parse.
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_template(DASHBOARD_TEMPLATE, embedded::DASHBOARD)
            .map_err(|e| TemplateError::Compile(e.to_string()))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render the dashboard page
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Render` if rendering fails.
    pub fn render_dashboard(&self, view: &DashboardView) -> Result<String, TemplateError> {
        let context = Context::from_serialize(view)?;
        self.tera
            .render(DASHBOARD_TEMPLATE, &context)
            .map_err(TemplateError::from)
    }
}

#[cfg(test)]
mod tests {
    use domain::Humidity;

    use super::*;

    fn reading() -> WeatherReading {
        WeatherReading::new(
            "Lyon",
            Measurement::new("temperature", 14.0).unwrap(),
            Humidity::new(72).unwrap(),
            Measurement::new("wind_speed", 11.5).unwrap(),
            "Light rain",
        )
        .unwrap()
        .with_precipitation(Some(Measurement::new("precipitation", 0.3).unwrap()))
    }

    fn view(weather: Option<ReadingView>, voice_enabled: bool) -> DashboardView {
        DashboardView {
            city: "Lyon".to_string(),
            weather,
            fetched_at: Some("2026-10-19 14:15 UTC".to_string()),
            voice_enabled,
            reload_interval_ms: 600_000,
        }
    }

    #[test]
    fn reading_view_formats_measurements() {
        let view = ReadingView::from_reading(&reading());
        assert_eq!(view.temperature, "14.0");
        assert_eq!(view.humidity, "72");
        assert_eq!(view.wind_speed, "11.5");
        assert_eq!(view.pressure, "None");
        assert_eq!(view.precipitation, "0.3");
    }

    #[test]
    fn renders_reading() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render_dashboard(&view(Some(ReadingView::from_reading(&reading())), true))
            .unwrap();

        assert!(html.contains("14.0°C"));
        assert!(html.contains("Light rain"));
        assert!(html.contains("<strong>Humidity:</strong> 72%"));
        assert!(html.contains("<strong>Pressure:</strong> None hPa"));
        assert!(html.contains("/api/voice-recognition"));
        assert!(html.contains("600000"));
        assert!(!html.contains("Voice assistant is not available."));
    }

    #[test]
    fn renders_placeholder_without_reading() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine.render_dashboard(&view(None, true)).unwrap();
        assert!(html.contains("No weather data available"));
        assert!(html.contains("<strong>City:</strong> Lyon"));
    }

    #[test]
    fn disabled_voice_is_shown() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine.render_dashboard(&view(None, false)).unwrap();
        assert!(html.contains("Voice assistant is not available."));
        assert!(html.contains(" disabled>"));
    }

    #[test]
    fn provider_text_is_escaped() {
        let mut weather = ReadingView::from_reading(&reading());
        weather.description = "<script>alert(1)</script>".to_string();

        let engine = TemplateEngine::new().unwrap();
        let html = engine.render_dashboard(&view(Some(weather), true)).unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
