//! Seams between the bot core and the outside world.

use async_trait::async_trait;
use futures::stream::Stream;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::{IncomingMessage, OutgoingMessage};

/// A chat network connection the bot can speak on.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    async fn connect(&mut self) -> Result<()>;

    async fn disconnect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    async fn send(&self, message: OutgoingMessage) -> Result<()>;

    /// Stream of incoming messages. May only be taken once per connection.
    async fn listen(&mut self) -> Result<Box<dyn Stream<Item = IncomingMessage> + Send + Unpin>>;
}

/// Fire-and-forget line output used by the painting engine.
///
/// Implementations never report delivery; a failed send is the
/// implementation's problem to log.
pub trait LineSink: Send + Sync {
    fn send_line(&self, target: &str, text: &str);
}

impl LineSink for mpsc::UnboundedSender<OutgoingMessage> {
    fn send_line(&self, target: &str, text: &str) {
        if self.send(OutgoingMessage::new(target, text)).is_err() {
            tracing::warn!("Dropped line for {target}: outbound queue closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_sender_sink() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send_line("#art", "hello");
        let msg = rx.try_recv().unwrap();
        assert_eq!(msg, OutgoingMessage::new("#art", "hello"));
    }

    #[test]
    fn test_closed_sink_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel::<OutgoingMessage>();
        drop(rx);
        tx.send_line("#art", "nobody listening");
    }
}
