//! Email lifecycle events.
//!
//! Status transitions are published on a broadcast channel so other parts of
//! the process (delivery workers, audit sinks) can react without the service
//! knowing about them. Publishing with no subscribers is not an error.

use serde::Serialize;
use tokio::sync::broadcast;

use super::model::MarkdownEmail;

const DEFAULT_CAPACITY: usize = 256;

/// A status transition of a stored email
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EmailEvent {
    Sent { email: MarkdownEmail },
    Failed { email: MarkdownEmail, error: String },
}

impl EmailEvent {
    pub fn email(&self) -> &MarkdownEmail {
        match self {
            EmailEvent::Sent { email } | EmailEvent::Failed { email, .. } => email,
        }
    }
}

/// Broadcast bus for [`EmailEvent`]s
#[derive(Debug, Clone)]
pub struct EmailEventBus {
    sender: broadcast::Sender<EmailEvent>,
}

impl Default for EmailEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EmailEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EmailEvent> {
        self.sender.subscribe()
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, event: EmailEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!("Email event dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
