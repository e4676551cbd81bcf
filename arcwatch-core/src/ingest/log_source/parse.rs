use crate::event::{EventOrigin, RawEvent};
use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

// IP ... [timestamp] "METHOD PATH HTTP/x.y" STATUS SIZE
static ACCESS_LOG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\S+) .+ \[([^\]]+)\] "(\S+) (\S+) HTTP/[\d.]+" (\d+) (\d+|-)"#)
        .expect("access log pattern is a valid regex")
});

const LOG_TIME_WITH_ZONE: &str = "%d/%b/%Y:%H:%M:%S %z";
const LOG_TIME_NO_ZONE: &str = "%d/%b/%Y:%H:%M:%S";

/// Fields extracted from one access log line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub ip: IpAddr,
    pub method: String,
    pub path: String,
    pub status: u16,
    /// `None` when the server logged `-`.
    pub size: Option<u64>,
    pub log_time: Option<DateTime<Utc>>,
}

impl ParsedLine {
    pub fn into_raw_event(self) -> RawEvent {
        RawEvent {
            source_ip: self.ip,
            method: self.method,
            path: self.path,
            status_code: Some(self.status),
            response_size: self.size,
            occurred_at: Utc::now(),
            origin: EventOrigin::Log,
            log_time: self.log_time,
        }
    }
}

/// Returns `None` for anything that is not a well-formed access log line.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let caps = ACCESS_LOG_LINE.captures(line)?;

    let ip = caps[1].parse::<IpAddr>().ok()?;
    let status = caps[5].parse::<u16>().ok()?;
    let size = match &caps[6] {
        "-" => None,
        n => Some(n.parse::<u64>().ok()?),
    };

    Some(ParsedLine {
        ip,
        method: caps[3].to_string(),
        path: caps[4].to_string(),
        status,
        size,
        log_time: parse_log_time(&caps[2]),
    })
}

/// Common log format time, with or without a zone offset (no zone means UTC).
pub fn parse_log_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_str(raw, LOG_TIME_WITH_ZONE) {
        return Some(t.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, LOG_TIME_NO_ZONE)
        .ok()
        .map(|naive| naive.and_utc())
}
