//! Logging initialisation
//!
//! Installs the global `tracing` subscriber in text or JSON form.

mod logging;

pub use logging::{TelemetryError, init_logging};
