//! # ArtBot Agent
//! Command handling and the event loop that ties the scheduler, the
//! painting engine and a channel together.

pub mod bot;
pub mod commands;

pub use bot::ArtBot;
pub use commands::{Intent, IntentParser};
