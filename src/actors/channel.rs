//! Topic-tagged channel endpoints
//!
//! Point-to-point links are bounded `mpsc` channels, so a send suspends until the
//! transport accepts the message and delivery is FIFO per link. The alert broadcast
//! keeps one bounded link per subscriber and only returns once every subscriber has
//! accepted the message, so nothing is dropped for a slow subscriber.

use tokio::sync::mpsc;
use tracing::trace;

use crate::error::TransportError;

use super::messages::{Message, Topic};

/// Create a point-to-point link for `topic`
pub fn link(topic: Topic, capacity: usize) -> (Outbox, Inbox) {
    let (tx, rx) = mpsc::channel(capacity);
    (Outbox { topic, tx }, Inbox { topic, rx })
}

/// Sending end of a link
#[derive(Debug, Clone)]
pub struct Outbox {
    topic: Topic,
    tx: mpsc::Sender<Message>,
}

impl Outbox {
    pub async fn send(&self, message: Message) -> Result<(), TransportError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| TransportError::Disconnected { topic: self.topic })
    }
}

/// Receiving end of a link or of a broadcast subscription
#[derive(Debug)]
pub struct Inbox {
    topic: Topic,
    rx: mpsc::Receiver<Message>,
}

impl Inbox {
    /// Wait for the next message
    ///
    /// There is no timeout: a role blocks here until its upstream sends or goes away.
    pub async fn recv(&mut self) -> Result<Message, TransportError> {
        self.rx
            .recv()
            .await
            .ok_or(TransportError::Closed { topic: self.topic })
    }
}

/// Fan-out to every subscriber of the alert broadcast
///
/// Only roles that call [`Broadcast::subscribe`] ever see a broadcast message.
#[derive(Debug)]
pub struct Broadcast {
    topic: Topic,
    capacity: usize,
    subscribers: Vec<mpsc::Sender<Message>>,
}

impl Broadcast {
    pub fn new(capacity: usize) -> Self {
        Self {
            topic: Topic::AlertBroadcast,
            capacity,
            subscribers: Vec::new(),
        }
    }

    /// Register a new subscriber
    ///
    /// Subscribers must be registered before the broadcast is handed to its sender.
    pub fn subscribe(&mut self) -> Inbox {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers.push(tx);
        Inbox {
            topic: self.topic,
            rx,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver `message` to every subscriber, in registration order
    ///
    /// Returns the number of subscribers reached. A subscriber that went away is a
    /// transport failure for the sender.
    pub async fn send(&self, message: Message) -> Result<usize, TransportError> {
        for subscriber in &self.subscribers {
            subscriber
                .send(message)
                .await
                .map_err(|_| TransportError::Disconnected { topic: self.topic })?;
        }

        trace!(
            "broadcast seq={} to {} subscribers",
            message.sequence(),
            self.subscribers.len()
        );

        Ok(self.subscribers.len())
    }
}
