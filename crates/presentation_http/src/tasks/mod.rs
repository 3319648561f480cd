//! Background tasks for the HTTP presentation layer

mod weather_refresh;

pub use weather_refresh::spawn_weather_refresh_task;
