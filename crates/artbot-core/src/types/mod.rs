//! Shared value types.

pub mod message;
pub mod time;

pub use message::{IncomingMessage, OutgoingMessage};
pub use time::{DayOfWeek, TimeOfDay};
