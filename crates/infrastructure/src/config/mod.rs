//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `weather`: WeatherAPI.com key, city and refresh interval
//! - `logging`: log filter and output format
//!
//! Speech and audio device settings come straight from `ai_speech`.
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `config.toml` (or the file named by `WEATHER_CLEAR_CONFIG`), then
//! `WEATHER_CLEAR__SECTION__KEY` environment variables.

mod logging;
mod server;
mod weather;

use std::path::{Path, PathBuf};

use ai_speech::{AudioDeviceConfig, SpeechConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use weather::WeatherAppConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WEATHER_CLEAR";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "WEATHER_CLEAR_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Speech processing configuration (absent disables voice)
    #[serde(default)]
    pub speech: Option<SpeechConfig>,

    /// Microphone and speaker settings
    #[serde(default)]
    pub capture: AudioDeviceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load_from(path.as_deref(), environment())
    }

    /// Load from an explicit file (required when given) and environment source
    ///
    /// Without a file, `config.toml` in the working directory is read if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load_from(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Validate the sections the server cannot start without
    ///
    /// `speech` and `capture` are left to [`Self::voice_settings`] and the
    /// capture adapter, which turn voice off instead of failing.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.weather.validate()
    }

    /// Speech settings when voice is configured and valid
    ///
    /// An invalid `speech` section disables voice with a warning instead of
    /// failing startup.
    #[must_use]
    pub fn voice_settings(&self) -> Option<&SpeechConfig> {
        let speech = self.speech.as_ref()?;
        match speech.validate() {
            Ok(()) => Some(speech),
            Err(e) => {
                warn!(error = %e, "Invalid speech configuration, voice assistant disabled");
                None
            },
        }
    }
}

/// Environment source for `WEATHER_CLEAR__SECTION__KEY` variables
#[must_use]
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
