use crate::hub::{BroadcastHub, SubscriberId};
use std::sync::Arc;

/// RAII guard for a registered subscriber.
///
/// Invariants:
/// - created only by [`BroadcastHub::subscribe`], after registration
/// - unsubscribes exactly once on Drop (a no-op if the hub already dropped it)
#[derive(Debug)]
pub struct SubscriberGuard {
    hub: Arc<BroadcastHub>,
    id: SubscriberId,
}

impl SubscriberGuard {
    pub(crate) fn new_registered(hub: Arc<BroadcastHub>, id: SubscriberId) -> Self {
        Self { hub, id }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
