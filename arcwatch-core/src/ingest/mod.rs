//! Raw event producers.
//!
//! Both producers (the request observer and the access log reader) emit into
//! the same [`RawEventSink`], so the ingestion pipeline never needs to know
//! where an event came from.

pub mod log_source;
mod observer;


pub use observer::{RequestCtx, RequestObserver, is_static_asset};

use crate::event::RawEvent;
use tokio::sync::mpsc;

/// Producer side of the ingestion channel.
#[derive(Debug, Clone)]
pub struct RawEventSink {
    tx: mpsc::Sender<RawEvent>,
}

/// Create the ingestion channel shared by every producer.
pub fn raw_event_channel(buffer: usize) -> (RawEventSink, mpsc::Receiver<RawEvent>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (RawEventSink { tx }, rx)
}

impl RawEventSink {
    /// Never waits. Returns false when the event was dropped (channel full or closed).
    pub fn try_emit(&self, event: RawEvent) -> bool {
        self.tx.try_send(event).is_ok()
    }

    /// Waits for room in the channel. Returns false once the pipeline is gone.
    pub async fn emit(&self, event: RawEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
