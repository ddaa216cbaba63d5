//! # ArtBot Channels
//! Chat network connections for ArtBot.

pub mod format;
pub mod irc;

pub use irc::{IrcChannel, IrcConfig, IrcSender};
