use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Which producer observed the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOrigin {
    /// Inbound HTTP request seen by the serving layer.
    Request,
    /// Line appended to the tailed access log.
    Log,
}

/// An unenriched observation of a single request or log line.
///
/// Immutable once created: producers build it in one go and hand it to the
/// ingestion channel by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(rename = "ip")]
    pub source_ip: IpAddr,

    #[serde(rename = "requestType")]
    pub method: String,

    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_size: Option<u64>,

    /// Ingestion time, epoch milliseconds on the wire.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub occurred_at: DateTime<Utc>,

    #[serde(rename = "source")]
    pub origin: EventOrigin,

    /// Timestamp printed in the access log line, when it could be parsed.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub log_time: Option<DateTime<Utc>>,
}

impl RawEvent {
    pub fn from_request(source_ip: IpAddr, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            source_ip,
            method: method.into(),
            path: path.into(),
            status_code: None,
            response_size: None,
            occurred_at: Utc::now(),
            origin: EventOrigin::Request,
            log_time: None,
        }
    }
}

/// Best available location for an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(rename = "lat")]
    pub latitude: f64,

    #[serde(rename = "lng")]
    pub longitude: f64,

    /// ISO 3166-1 alpha-2, e.g. FR
    #[serde(rename = "country")]
    pub country_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// A raw event that was successfully geolocated.
///
/// Only the ingestion pipeline constructs these; an event that cannot be
/// located never becomes an `EnrichedEvent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    #[serde(flatten)]
    pub raw: RawEvent,

    #[serde(flatten)]
    pub location: GeoLocation,
}

impl EnrichedEvent {
    pub(crate) fn new(raw: RawEvent, location: GeoLocation) -> Self {
        Self { raw, location }
    }
}

/// Fixed coordinates of the serving node. Viewers draw every arc towards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerLocation {
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,

    #[serde(rename = "lng", alias = "longitude")]
    pub longitude: f64,

    pub label: String,
}

impl Default for ServerLocation {
    fn default() -> Self {
        // Paris
        Self {
            latitude: 48.8566,
            longitude: 2.3522,
            label: "Main Server".to_string(),
        }
    }
}
