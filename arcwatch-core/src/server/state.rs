use crate::conf::ArcwatchConfig;
use crate::event::ServerLocation;
use crate::ingest::RequestObserver;
use crate::pipeline::IngestionPipeline;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IngestionPipeline>,
    pub observer: Arc<RequestObserver>,
    pub viewer: Arc<ViewerSettings>,
}

/// Served at `/api/viewer-config` so viewers need no baked-in settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSettings {
    pub server: ServerLocation,
    pub display_capacity: usize,
    pub reconnect_backoff_ms: u64,
    pub stream_path: String,
}

impl ViewerSettings {
    pub fn from_config(cfg: &ArcwatchConfig) -> Self {
        Self {
            server: cfg.server.location.clone(),
            display_capacity: cfg.viewer.display_capacity,
            reconnect_backoff_ms: u64::try_from(cfg.viewer.reconnect_backoff().as_millis())
                .unwrap_or(u64::MAX),
            stream_path: cfg.server.stream_path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub subscribers: usize,
    pub history: usize,
}
