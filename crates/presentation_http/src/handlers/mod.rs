//! HTTP request handlers

pub mod dashboard;
pub mod health;
pub mod voice;
pub mod weather;
