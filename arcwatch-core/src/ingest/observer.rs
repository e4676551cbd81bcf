use crate::enrichment::resolve_client_ip;
use crate::event::RawEvent;
use crate::ingest::RawEventSink;
use http::{HeaderMap, Method};
use ipnet::IpNet;
use std::net::IpAddr;
use tracing::debug;

const STATIC_ASSET_EXTENSIONS: &[&str] = &[
    "js", "css", "png", "jpg", "jpeg", "gif", "svg", "ico", "map", "woff", "woff2", "ttf", "webp",
    "json",
];

/// What the serving layer hands the observer for each inbound request.
#[derive(Debug)]
pub struct RequestCtx<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    /// Address of the TCP peer (possibly a reverse proxy).
    pub peer_ip: IpAddr,
}

/// Derives a raw event from every inbound request it is shown.
///
/// Observation never blocks or fails the request: emission is a `try_send`,
/// and a full ingestion channel simply drops the observation.
#[derive(Debug)]
pub struct RequestObserver {
    sink: RawEventSink,
    trusted_proxies: Vec<IpNet>,
    excluded_paths: Vec<String>,
}

impl RequestObserver {
    /// `excluded_paths` are matched exactly (e.g. the viewer-stream handshake path).
    pub fn new<I, S>(sink: RawEventSink, trusted_proxies: Vec<IpNet>, excluded_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sink,
            trusted_proxies,
            excluded_paths: excluded_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn should_observe(&self, path: &str) -> bool {
        !self.excluded_paths.iter().any(|p| p == path) && !is_static_asset(path)
    }

    /// Returns true when an event was handed to the pipeline.
    pub fn observe(&self, ctx: &RequestCtx<'_>) -> bool {
        if !self.should_observe(ctx.path) {
            return false;
        }

        let client_ip = resolve_client_ip(ctx.headers, ctx.peer_ip, &self.trusted_proxies);
        let event = RawEvent::from_request(client_ip, ctx.method.as_str(), ctx.path);

        let emitted = self.sink.try_emit(event);
        if !emitted {
            debug!(ip = %client_ip, path = ctx.path, "ingestion channel full, observation dropped");
        }
        emitted
    }
}

/// Static viewer assets are served constantly and say nothing about traffic.
pub fn is_static_asset(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);

    last_segment
        .rsplit_once('.')
        .map(|(_, ext)| {
            STATIC_ASSET_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
