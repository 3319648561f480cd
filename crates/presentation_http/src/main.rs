//! Weather Clear HTTP Server
//!
//! Main entry point for the dashboard server.

use std::future::IntoFuture;
use std::sync::Arc;

use infrastructure::{AppConfig, LoggingConfig, TemplateEngine, init_logging};
use presentation_http::{
    bootstrap, routes,
    shutdown::{serve_until_drained, shutdown_signal},
    spawn_weather_refresh_task,
    state::AppState,
};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging settings live in the config, so load it before the subscriber exists
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default())?;
            error!(error = %e, "Failed to load configuration");
            anyhow::bail!("Failed to load configuration: {e}");
        },
    };

    init_logging(&config.logging)?;

    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid configuration: {e}");
    }

    info!("🌤️  Weather Clear v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = %config.server.port,
        city = %config.weather.city,
        refresh_secs = config.weather.refresh_interval_secs,
        "Configuration loaded"
    );

    let weather = bootstrap::weather_service(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize weather client: {e}"))?;
    let voice = bootstrap::voice_assistant(&config, Arc::clone(weather.store()));
    let templates = TemplateEngine::new()?;

    info!("🔄 Initializing weather data...");
    if weather.refresh().await.is_some() {
        info!(city = %weather.city(), "Current weather loaded");
    } else {
        warn!("Could not load initial weather data. Will retry later.");
    }

    let refresh_handle =
        spawn_weather_refresh_task(Arc::clone(&weather), config.weather.refresh_interval());

    let config = Arc::new(config);
    let state = AppState {
        weather,
        voice,
        templates,
        config: Arc::clone(&config),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET])
            .allow_headers(Any)
    };

    let app = app.layer(TraceLayer::new_for_http()).layer(cors_layer);

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("🌐 Web server started at http://{}", addr);
    info!("⛔ Press Ctrl+C to exit the application");

    let drain_started = Arc::new(Notify::new());
    let serve = axum::serve(listener, app)
        .with_graceful_shutdown({
            let drain_started = Arc::clone(&drain_started);
            async move {
                shutdown_signal().await;
                drain_started.notify_one();
            }
        })
        .into_future();

    let outcome = serve_until_drained(
        serve,
        drain_started.notified(),
        config.server.shutdown_timeout(),
    )
    .await?;

    refresh_handle.abort();
    info!(?outcome, "👋 Server shutdown complete");

    Ok(())
}
