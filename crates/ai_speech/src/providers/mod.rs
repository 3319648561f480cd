//! Speech provider implementations

pub mod openai;
pub mod piper;
pub mod whisper_cpp;
