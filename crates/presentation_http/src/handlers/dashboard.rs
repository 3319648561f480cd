//! Dashboard page

use axum::{extract::State, response::Html};
use infrastructure::{DashboardView, ReadingView};

use crate::{error::ApiError, state::AppState};

/// `GET /`
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snapshot = state.weather.current_or_refresh().await;
    let reload_interval_ms =
        u64::try_from(state.config.weather.refresh_interval().as_millis()).unwrap_or(u64::MAX);

    let view = DashboardView {
        city: state.weather.city().to_string(),
        weather: snapshot
            .as_ref()
            .map(|s| ReadingView::from_reading(&s.reading)),
        fetched_at: snapshot
            .as_ref()
            .map(|s| s.fetched_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        voice_enabled: state.voice.is_some(),
        reload_interval_ms,
    };

    Ok(Html(state.templates.render_dashboard(&view)?))
}
