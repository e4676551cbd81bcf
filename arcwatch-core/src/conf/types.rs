use crate::event::ServerLocation;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root of `arcwatch.hcl`. Every block and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArcwatchConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub geoip: GeoIpConfig,
    pub identity: IdentityConfig,
    pub log_source: LogSourceConfig,
    pub viewer: ViewerConfig,
}

impl ArcwatchConfig {
    /// Render as `arcwatch.hcl` source that `parse_config` accepts back.
    pub fn to_hcl(&self) -> Result<String, hcl::Error> {
        hcl::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: String,

    /// Built viewer assets; served as the fallback route when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,

    /// Viewer-stream handshake path.
    pub stream_path: String,

    pub location: ServerLocation,

    /// Raw events buffered between producers and the pipeline.
    pub ingest_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            static_dir: None,
            stream_path: "/stream".to_string(),
            location: ServerLocation::default(),
            ingest_buffer: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: crate::store::DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeoIpConfig {
    /// MaxMind City / GeoLite2-City database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_db: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// CIDR strings (or bare addresses) whose X-Forwarded-For is honoured.
    pub trusted_proxies: Vec<String>,
}

impl IdentityConfig {
    /// Entries that fail to parse are skipped; `validate` reports them.
    pub fn trusted_networks(&self) -> Vec<IpNet> {
        self.trusted_proxies
            .iter()
            .filter_map(|raw| crate::enrichment::parse_trusted_proxies(&[raw]).ok())
            .flatten()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSourceConfig {
    pub enable: bool,

    /// Checked in order; the first existing file is tailed.
    pub candidates: Vec<PathBuf>,

    pub poll_interval_ms: u64,
}

impl Default for LogSourceConfig {
    fn default() -> Self {
        Self {
            enable: true,
            candidates: vec![
                PathBuf::from("/var/log/nginx/access.log"),
                PathBuf::from("/var/log/apache2/access.log"),
                PathBuf::from("/var/log/httpd/access_log"),
            ],
            poll_interval_ms: 250,
        }
    }
}

impl LogSourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Arcs kept on screen by each viewer.
    pub display_capacity: usize,

    pub reconnect_backoff_secs: u64,

    /// Frames buffered per viewer before it is considered too slow.
    pub send_buffer: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            display_capacity: crate::client::DEFAULT_DISPLAY_CAPACITY,
            reconnect_backoff_secs: 5,
            send_buffer: crate::hub::DEFAULT_SEND_BUFFER,
        }
    }
}

impl ViewerConfig {
    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_secs(self.reconnect_backoff_secs)
    }
}
