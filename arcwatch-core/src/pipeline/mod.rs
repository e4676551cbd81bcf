//! resolve -> append -> publish, for every raw event from every producer.


use crate::enrichment::GeoResolver;
use crate::event::{EnrichedEvent, RawEvent, encode_event, encode_init};
use crate::hub::{BroadcastHub, PublishReport, Subscription};
use crate::shutdown::ShutdownSignal;
use crate::store::EventStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What happened to one raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Published(PublishReport),
    /// No location: neither stored nor broadcast.
    Unresolvable,
    /// Serialization failed; the event was dropped before touching history.
    EncodeFailed,
}

/// Owns the event history and feeds the broadcast hub.
///
/// Append and publish happen under one lock, and `subscribe` snapshots under
/// that same lock. Every viewer therefore sees history followed by live
/// events in a single global order, with no gap and no duplicate.
/// Geolocation and encoding run outside the lock.
pub struct IngestionPipeline {
    resolver: Arc<dyn GeoResolver>,
    store: Mutex<EventStore>,
    hub: Arc<BroadcastHub>,
}

impl IngestionPipeline {
    pub fn new(resolver: Arc<dyn GeoResolver>, history_capacity: usize, hub: Arc<BroadcastHub>) -> Self {
        Self {
            resolver,
            store: Mutex::new(EventStore::new(history_capacity)),
            hub,
        }
    }

    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    pub fn ingest(&self, raw: RawEvent) -> IngestOutcome {
        let Some(location) = self.resolver.resolve(raw.source_ip) else {
            debug!(ip = %raw.source_ip, path = %raw.path, "unresolvable address, event dropped");
            return IngestOutcome::Unresolvable;
        };

        let event = EnrichedEvent::new(raw, location);
        let frame = match encode_event(&event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, ip = %event.raw.source_ip, "failed to encode event");
                return IngestOutcome::EncodeFailed;
            }
        };

        let ip = event.raw.source_ip;
        let country = event.location.country_code.clone();

        let report = {
            let mut store = self.lock_store();
            store.append(event);
            self.hub.publish(&frame)
        };

        debug!(
            ip = %ip,
            country = %country,
            delivered = report.delivered,
            removed = report.removed,
            "event published"
        );

        IngestOutcome::Published(report)
    }

    /// Register a viewer whose first frame is the history as of this call.
    pub fn subscribe(&self) -> serde_json::Result<Subscription> {
        let store = self.lock_store();
        let initial = encode_init(&store.snapshot())?;
        Ok(self.hub.subscribe(initial))
    }

    pub fn snapshot(&self) -> Vec<EnrichedEvent> {
        self.lock_store().snapshot()
    }

    pub fn history_len(&self) -> usize {
        self.lock_store().len()
    }

    /// Drain the ingestion channel until shutdown or until every producer is
    /// gone, then close every viewer channel.
    pub async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<RawEvent>, mut shutdown: ShutdownSignal) {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    debug!("ingestion pipeline received shutdown");
                    break;
                }
                next = rx.recv() => match next {
                    Some(raw) => {
                        self.ingest(raw);
                    }
                    None => {
                        debug!("all producers gone");
                        break;
                    }
                },
            }
        }

        self.hub.close_all();
        info!(history = self.history_len(), "ingestion pipeline stopped");
    }

    fn lock_store(&self) -> MutexGuard<'_, EventStore> {
        // append is a single push/pop pair; a poisoned store is still consistent.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
