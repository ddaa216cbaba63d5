//! # ArtBot Core
//!
//! Shared error type, configuration, calendar and message types,
//! channel traits, and the painting catalog.

pub mod catalog;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use catalog::{MessageCatalog, Painting};
pub use config::ArtBotConfig;
pub use error::{ArtBotError, Result};
