use crate::event::EnrichedEvent;
use std::collections::VecDeque;

#[cfg(test)]
mod tests;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded, most-recent-first history of enriched events.
///
/// Invariants:
/// - `len() <= capacity()` after every call
/// - index 0 is always the most recently appended event
/// - the backing storage never escapes; readers get copies via [`snapshot`]
///
/// [`snapshot`]: EventStore::snapshot
#[derive(Debug)]
pub struct EventStore {
    events: VecDeque<EnrichedEvent>,
    capacity: usize,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl EventStore {
    /// A zero capacity is bumped to one; config validation rejects it earlier.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entry once at capacity.
    pub fn append(&mut self, event: EnrichedEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_back();
        }
        self.events.push_front(event);
    }

    /// Point-in-time copy, most recent first.
    pub fn snapshot(&self) -> Vec<EnrichedEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
