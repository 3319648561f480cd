//! Weather Clear HTTP presentation layer
//!
//! Serves the dashboard page, the JSON reading and the voice endpoint, and
//! owns the background refresh task.

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod tasks;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use tasks::spawn_weather_refresh_task;
