use crate::enrichment::GeoResolver;
use crate::event::{EnrichedEvent, EventOrigin, GeoLocation, RawEvent};
use chrono::{TimeZone, Utc};
use std::net::{IpAddr, Ipv4Addr};

/// Location used by every fixture event.
pub fn paris() -> GeoLocation {
    GeoLocation {
        latitude: 48.85,
        longitude: 2.35,
        country_code: "FR".to_string(),
        city: Some("Paris".to_string()),
    }
}

/// Raw request event whose path encodes `seq`, e.g. `/seq/7`.
pub fn raw(seq: u32) -> RawEvent {
    RawEvent {
        source_ip: IpAddr::V4(Ipv4Addr::new(203, 0, 113, (seq % 250) as u8 + 1)),
        method: "GET".to_string(),
        path: format!("/seq/{seq}"),
        status_code: None,
        response_size: None,
        occurred_at: Utc.timestamp_millis_opt(1_700_000_000_000 + seq as i64).unwrap(),
        origin: EventOrigin::Request,
        log_time: None,
    }
}

pub fn enriched(seq: u32) -> EnrichedEvent {
    EnrichedEvent::new(raw(seq), paris())
}

/// Recover the sequence number from a fixture event path.
pub fn seq_of(event: &EnrichedEvent) -> u32 {
    event
        .raw
        .path
        .trim_start_matches("/seq/")
        .parse()
        .unwrap()
}

/// Places every routable address in Paris.
#[derive(Debug, Default)]
pub struct ParisResolver;

impl GeoResolver for ParisResolver {
    fn lookup(&self, _ip: IpAddr) -> Option<GeoLocation> {
        Some(paris())
    }
}
