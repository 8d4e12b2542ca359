//! Worker-thread side of the app: command intake, file IO, image decoding,
//! and the timer-driven pipeline runner.

pub mod commands;
pub mod runtime;
