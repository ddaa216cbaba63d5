//! Read-only catalog of paintings and quotes, built once at startup.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::ArtBotConfig;

/// A multi-line ASCII painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Painting {
    pub tag: String,
    pub lines: Vec<String>,
    pub colored: bool,
}

/// Paintings and quotes available to the bot.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    paintings: Vec<Painting>,
    quotes: Vec<String>,
    attribution: String,
}

impl MessageCatalog {
    pub fn new(paintings: Vec<Painting>, quotes: Vec<String>, attribution: impl Into<String>) -> Self {
        Self {
            paintings,
            quotes,
            attribution: attribution.into(),
        }
    }

    pub fn from_config(config: &ArtBotConfig) -> Self {
        let paintings = config
            .paintings
            .iter()
            .map(|p| Painting {
                tag: p.tag.clone(),
                lines: p.message.clone(),
                colored: p.colored_message,
            })
            .collect();
        Self::new(paintings, config.quotes.clone(), config.quote_attribution.clone())
    }

    pub fn paintings(&self) -> &[Painting] {
        &self.paintings
    }

    /// Uniformly random painting, `None` only for an empty catalog.
    pub fn random_painting<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Painting> {
        self.paintings.choose(rng)
    }

    /// First painting whose tag equals `tag` exactly.
    pub fn painting_by_tag(&self, tag: &str) -> Option<&Painting> {
        self.paintings.iter().find(|p| p.tag == tag)
    }

    /// All tags, sorted lexicographically.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.paintings.iter().map(|p| p.tag.as_str()).collect();
        tags.sort_unstable();
        tags
    }

    /// A random quote with its attribution appended.
    pub fn random_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        self.quotes
            .choose(rng)
            .map(|q| format!("{q} - {}", self.attribution))
    }
}
