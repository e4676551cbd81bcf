use crate::event::EnrichedEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A serialized viewer-stream message, shared by every subscriber it is sent to.
pub type Frame = Arc<str>;

/// The two message shapes carried by the viewer stream.
///
/// - `Init` is sent once, at subscribe time: `{"type":"init","data":[...]}`
/// - `Event` is a bare event object for every live event after that
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerMessage {
    Init(Vec<EnrichedEvent>),
    Event(EnrichedEvent),
}

#[derive(Serialize)]
struct InitRef<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a [EnrichedEvent],
}

#[derive(Deserialize)]
struct InitOwned {
    data: Vec<EnrichedEvent>,
}

#[derive(Deserialize)]
struct Probe {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

const INIT_TYPE: &str = "init";

pub fn encode_init(snapshot: &[EnrichedEvent]) -> serde_json::Result<Frame> {
    let json = serde_json::to_string(&InitRef {
        kind: INIT_TYPE,
        data: snapshot,
    })?;
    Ok(Frame::from(json))
}

pub fn encode_event(event: &EnrichedEvent) -> serde_json::Result<Frame> {
    Ok(Frame::from(serde_json::to_string(event)?))
}

impl ViewerMessage {
    pub fn encode(&self) -> serde_json::Result<Frame> {
        match self {
            ViewerMessage::Init(events) => encode_init(events),
            ViewerMessage::Event(event) => encode_event(event),
        }
    }

    pub fn decode(text: &str) -> serde_json::Result<Self> {
        let probe: Probe = serde_json::from_str(text)?;

        if probe.kind.as_deref() == Some(INIT_TYPE) {
            let init: InitOwned = serde_json::from_str(text)?;
            Ok(ViewerMessage::Init(init.data))
        } else {
            Ok(ViewerMessage::Event(serde_json::from_str(text)?))
        }
    }
}
