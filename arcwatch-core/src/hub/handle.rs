use crate::event::Frame;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

pub type SubscriberId = Uuid;

/// Result of a single non-blocking delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// The subscriber's buffer is full: it is not keeping up.
    Lagging,
    /// The receiving side is gone.
    Closed,
}

/// Send capability for one connected viewer.
#[derive(Debug)]
pub struct SubscriberHandle {
    id: SubscriberId,
    sender: mpsc::Sender<Frame>,
}

impl SubscriberHandle {
    pub(crate) fn new(sender: mpsc::Sender<Frame>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Never waits: a slow viewer must not stall delivery to the others.
    pub fn try_send(&self, frame: Frame) -> SendOutcome {
        match self.sender.try_send(frame) {
            Ok(()) => SendOutcome::Delivered,
            Err(TrySendError::Full(_)) => SendOutcome::Lagging,
            Err(TrySendError::Closed(_)) => SendOutcome::Closed,
        }
    }
}
