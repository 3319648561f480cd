//! Weather Clear CLI
//!
//! One-shot access to the same services the server runs: print the current
//! reading, answer a typed question, or run a single voice cycle.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::sync::Arc;

use application::{QueryResponder, WeatherService};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, LogFormat, LoggingConfig, init_logging};
use presentation_http::{bootstrap, handlers::voice::VOICE_DISABLED};
use tracing::warn;

/// Weather Clear CLI
#[derive(Parser)]
#[command(name = "weather-clear")]
#[command(author, version, about = "Weather Clear dashboard CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "WEATHER_CLEAR_CONFIG")]
    config: Option<PathBuf>,

    /// City to query instead of the configured one
    #[arg(long, global = true)]
    city: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the current reading
    Current {
        /// Print the reading as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a typed weather question
    ///
    /// Example: weather-clear ask "what should I wear today?"
    Ask {
        /// Question text
        question: String,
    },

    /// Listen for one spoken question and answer it out loud
    Listen,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

async fn fetch(service: &WeatherService) -> anyhow::Result<()> {
    if service.refresh().await.is_none() {
        anyhow::bail!("Could not fetch weather data for {}", service.city());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        filter: log_filter_from_verbosity(cli.verbose).to_string(),
        format: LogFormat::Text,
    })?;

    let mut config =
        AppConfig::load_from(cli.config.as_deref(), infrastructure::config::environment())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;
    if let Some(city) = cli.city {
        config.weather.city = city;
    }

    let weather = bootstrap::weather_service(&config)?;

    match cli.command {
        Commands::Current { json } => {
            fetch(&weather).await?;
            if let Some(snapshot) = weather.current() {
                if json {
                    println!("{}", serde_json::to_string_pretty(&snapshot.reading)?);
                } else {
                    println!("🌤️  {}", snapshot.reading);
                }
            }
        },

        Commands::Ask { question } => {
            if let Err(e) = fetch(&weather).await {
                warn!(error = %e, "Answering without weather data");
            }
            let snapshot = weather.current();
            let answer =
                QueryResponder::new().respond(&question, snapshot.as_ref().map(|s| &s.reading));
            println!("{answer}");
        },

        Commands::Listen => {
            let Some(voice) = bootstrap::voice_assistant(&config, Arc::clone(weather.store()))
            else {
                anyhow::bail!(VOICE_DISABLED);
            };
            if let Err(e) = fetch(&weather).await {
                warn!(error = %e, "Listening without weather data");
            }

            println!("🎤 Listening...");
            println!("{}", voice.listen().await.message());
        },
    }

    Ok(())
}
