//! Unified error types for ArtBot.

use thiserror::Error;

/// Result type alias using ArtBotError.
pub type Result<T> = std::result::Result<T, ArtBotError>;

#[derive(Error, Debug)]
pub enum ArtBotError {
    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // Channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Channel not connected: {0}")]
    ChannelNotConnected(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtBotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }
}
