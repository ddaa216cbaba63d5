//! ArtBot configuration, loaded once from `~/.artbot/config.toml`.
//!
//! The loaded value is immutable and handed to each component by
//! reference; nothing reads configuration from a global.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ArtBotError, Result};
use crate::types::{DayOfWeek, TimeOfDay};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtBotConfig {
    pub nick: String,
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub art_channel: String,
    pub tea_channel: String,

    pub daily_event_time: TimeOfDay,
    pub lunchtime: TimeOfDay,
    pub breaktime: TimeOfDay,
    pub teatime: TimeOfDay,
    /// Weekday the humpday painting fires on, at `daily-event-time`.
    #[serde(default = "default_humpday")]
    pub humpday: DayOfWeek,

    pub humpday_painting: Vec<String>,
    pub lunchtime_painting: Vec<String>,
    pub breaktime_painting: Vec<String>,
    pub teatime_painting: Vec<String>,

    pub paintings: Vec<PaintingConfig>,
    pub quotes: Vec<String>,
    #[serde(default = "default_attribution")]
    pub quote_attribution: String,

    #[serde(default)]
    pub pacing: PacingConfig,
}

/// One taggable painting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PaintingConfig {
    pub tag: String,
    pub message: Vec<String>,
    /// Lines carry `^k` color markers.
    #[serde(default)]
    pub colored_message: bool,
}

/// Delays used when streaming a painting, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PacingConfig {
    #[serde(default = "default_lead_in")]
    pub lead_in_secs: u64,
    #[serde(default = "default_line_step")]
    pub line_step_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            lead_in_secs: default_lead_in(),
            line_step_secs: default_line_step(),
        }
    }
}

fn default_port() -> u16 { 6667 }
fn default_humpday() -> DayOfWeek { DayOfWeek::Wednesday }
fn default_attribution() -> String { "Bob Ross".into() }
/// Upper bound for either pacing delay.
pub const MAX_PACING_SECS: u64 = 3600;

fn default_lead_in() -> u64 { 1 }
fn default_line_step() -> u64 { 2 }

impl ArtBotConfig {
    /// ArtBot home directory (`~/.artbot`).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".artbot")
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ArtBotError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the bot cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.nick.trim().is_empty() {
            return Err(ArtBotError::config("`nick` must not be empty"));
        }
        if self.server.trim().is_empty() {
            return Err(ArtBotError::config("`server` must not be empty"));
        }
        for (key, channel) in [("art-channel", &self.art_channel), ("tea-channel", &self.tea_channel)] {
            if !channel.starts_with('#') && !channel.starts_with('&') {
                return Err(ArtBotError::config(format!(
                    "`{key}` must be a channel name starting with '#' or '&', got {channel:?}"
                )));
            }
        }
        if self.paintings.is_empty() {
            return Err(ArtBotError::config("`paintings` must contain at least one painting"));
        }
        if let Some(p) = self.paintings.iter().find(|p| p.tag.trim().is_empty()) {
            return Err(ArtBotError::config(format!(
                "painting with {} lines has an empty tag",
                p.message.len()
            )));
        }
        if self.quotes.is_empty() {
            return Err(ArtBotError::config("`quotes` must contain at least one quote"));
        }
        if self.pacing.line_step_secs == 0 {
            return Err(ArtBotError::config("`pacing.line-step-secs` must be at least 1"));
        }
        for (key, secs) in [
            ("lead-in-secs", self.pacing.lead_in_secs),
            ("line-step-secs", self.pacing.line_step_secs),
        ] {
            if secs > MAX_PACING_SECS {
                return Err(ArtBotError::config(format!(
                    "`pacing.{key}` must be at most {MAX_PACING_SECS}, got {secs}"
                )));
            }
        }
        Ok(())
    }
}
