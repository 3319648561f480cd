//! Application layer - Use cases and orchestration
//!
//! Holds the port definitions and the services built on them: the shared
//! weather snapshot, on-demand and periodic refresh, the keyword responder,
//! and the single-flight voice assistant.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
