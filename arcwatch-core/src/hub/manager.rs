use crate::event::Frame;
use crate::hub::{SendOutcome, SubscriberGuard, SubscriberHandle, SubscriberId};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const DEFAULT_SEND_BUFFER: usize = 256;

/// Registry of connected viewers: subscriber id -> send capability.
///
/// The hub itself does not order publishes. Callers that need a single total
/// order (the ingestion pipeline) serialize their `publish` calls; the registry
/// only has to stay consistent while viewers join and leave concurrently.
#[derive(Debug)]
pub struct BroadcastHub {
    subscribers: DashMap<SubscriberId, SubscriberHandle>,
    send_buffer: usize,
}

/// Delivery statistics for one publish.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub removed: usize,
}

/// A live registration: the receiving end of one viewer's channel.
///
/// Dropping it unregisters the viewer.
#[derive(Debug)]
pub struct Subscription {
    guard: SubscriberGuard,
    receiver: mpsc::Receiver<Frame>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.guard.id()
    }

    /// Next frame, or `None` once the hub dropped this subscriber.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Frame> {
        self.receiver.try_recv().ok()
    }

    /// Stop accepting frames while staying registered; the hub drops this
    /// viewer on its next publish.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_BUFFER)
    }
}

impl BroadcastHub {
    pub fn new(send_buffer: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            // One slot is always needed for the initial batch.
            send_buffer: send_buffer.max(1),
        }
    }

    /// Register a new viewer whose first frame is `initial`.
    ///
    /// The initial frame is queued before the handle becomes visible to
    /// `publish`, so no live frame can overtake it.
    pub fn subscribe(self: &Arc<Self>, initial: Frame) -> Subscription {
        let (tx, receiver) = mpsc::channel(self.send_buffer);
        let handle = SubscriberHandle::new(tx);
        let id = handle.id();

        // Fresh channel with capacity >= 1: cannot be full or closed.
        let _ = handle.try_send(initial);
        self.subscribers.insert(id, handle);

        info!(
            subscriber_id = %id,
            subscribers = self.subscribers.len(),
            "viewer subscribed"
        );

        Subscription {
            guard: SubscriberGuard::new_registered(self.clone(), id),
            receiver,
        }
    }

    /// Remove a viewer. Safe to call repeatedly or after the hub dropped it.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            info!(
                subscriber_id = %id,
                subscribers = self.subscribers.len(),
                "viewer unsubscribed"
            );
        }
        removed
    }

    /// Deliver `frame` to every current subscriber.
    ///
    /// Best effort per viewer: a closed or lagging viewer is dropped from the
    /// registry and never affects delivery to the rest.
    pub fn publish(&self, frame: &Frame) -> PublishReport {
        let mut report = PublishReport::default();
        let mut failed = Vec::new();

        for entry in self.subscribers.iter() {
            match entry.value().try_send(frame.clone()) {
                SendOutcome::Delivered => report.delivered += 1,
                SendOutcome::Lagging => {
                    warn!(subscriber_id = %entry.key(), "viewer lagging, disconnecting");
                    failed.push(*entry.key());
                }
                SendOutcome::Closed => {
                    debug!(subscriber_id = %entry.key(), "viewer channel closed");
                    failed.push(*entry.key());
                }
            }
        }

        // Removal happens after iteration: DashMap shard locks are held by iter().
        for id in failed {
            if self.subscribers.remove(&id).is_some() {
                report.removed += 1;
            }
        }

        report
    }

    /// Drop every registration; each viewer's receiver then yields `None`.
    pub fn close_all(&self) {
        let count = self.subscribers.len();
        self.subscribers.clear();
        info!(closed = count, "closed all viewer channels");
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }
}
