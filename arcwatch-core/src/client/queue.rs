use crate::client::{DisplayEntry, DisplaySet};
use crate::event::{EnrichedEvent, ServerLocation, ViewerMessage};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inbox {
    pending: VecDeque<EnrichedEvent>,
    /// Set by an init message; the next drain starts from an empty display.
    resync: bool,
}

/// Producer handle: cheap to clone, never blocks for longer than a push.
#[derive(Debug, Clone)]
pub struct QueueWriter {
    inbox: Arc<Mutex<Inbox>>,
}

impl QueueWriter {
    /// An init batch replaces everything still pending and resets the
    /// display on the next drain; its events are queued in received order.
    pub fn push(&self, message: ViewerMessage) {
        let mut inbox = lock(&self.inbox);
        match message {
            ViewerMessage::Init(events) => {
                inbox.pending.clear();
                inbox.resync = true;
                inbox.pending.extend(events);
            }
            ViewerMessage::Event(event) => inbox.pending.push_back(event),
        }
    }

    pub fn pending_len(&self) -> usize {
        lock(&self.inbox).pending.len()
    }
}

/// Arrival queue plus the display set it feeds.
#[derive(Debug)]
pub struct ClientEventQueue {
    inbox: Arc<Mutex<Inbox>>,
    display: DisplaySet,
    server: ServerLocation,
}

impl ClientEventQueue {
    pub fn new(server: ServerLocation, display_capacity: usize) -> Self {
        Self {
            inbox: Arc::default(),
            display: DisplaySet::new(display_capacity),
            server,
        }
    }

    pub fn writer(&self) -> QueueWriter {
        QueueWriter {
            inbox: self.inbox.clone(),
        }
    }

    pub fn push(&self, message: ViewerMessage) {
        self.writer().push(message);
    }

    pub fn pending_len(&self) -> usize {
        lock(&self.inbox).pending.len()
    }

    /// Move every queued event, FIFO, into the display set. Returns how many
    /// were drained.
    pub fn drain(&mut self) -> usize {
        self.drain_with(&mut rand::rng())
    }

    pub fn drain_with<R: Rng>(&mut self, rng: &mut R) -> usize {
        let (batch, resync) = {
            let mut inbox = lock(&self.inbox);
            (
                std::mem::take(&mut inbox.pending),
                std::mem::take(&mut inbox.resync),
            )
        };

        if resync {
            self.display.clear();
        }

        let drained = batch.len();
        for event in batch {
            self.display
                .push(DisplayEntry::new(event, &self.server, rng));
        }
        drained
    }

    pub fn display(&self) -> &DisplaySet {
        &self.display
    }

    pub fn server(&self) -> &ServerLocation {
        &self.server
    }
}

fn lock(inbox: &Mutex<Inbox>) -> MutexGuard<'_, Inbox> {
    inbox.lock().unwrap_or_else(PoisonError::into_inner)
}
