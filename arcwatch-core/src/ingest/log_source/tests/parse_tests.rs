use crate::event::EventOrigin;
use crate::ingest::log_source::{ParsedLine, parse_line, parse_log_time};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

#[test]
fn parses_a_common_log_line() {
    let line = r#"203.0.113.5 - - [10/Oct/2023:13:55:36] "GET /api/data HTTP/1.1" 200 512"#;

    let parsed = parse_line(line).unwrap();

    assert_eq!(
        parsed,
        ParsedLine {
            ip: "203.0.113.5".parse().unwrap(),
            method: "GET".to_string(),
            path: "/api/data".to_string(),
            status: 200,
            size: Some(512),
            log_time: Some(Utc.with_ymd_and_hms(2023, 10, 10, 13, 55, 36).unwrap()),
        }
    );
}

#[test]
fn parses_a_combined_log_line_with_zone_and_trailing_fields() {
    let line = r#"2001:db8::1 - frank [10/Oct/2023:13:55:36 +0200] "POST /login HTTP/2.0" 302 - "https://example.com/" "curl/8.0""#;

    let parsed = parse_line(line).unwrap();

    assert_eq!(parsed.ip, "2001:db8::1".parse::<std::net::IpAddr>().unwrap());
    assert_eq!(parsed.method, "POST");
    assert_eq!(parsed.path, "/login");
    assert_eq!(parsed.status, 302);
    assert_eq!(parsed.size, None);
    assert_eq!(
        parsed.log_time,
        Some(Utc.with_ymd_and_hms(2023, 10, 10, 11, 55, 36).unwrap())
    );
}

#[test]
fn malformed_lines_are_rejected() {
    for line in [
        "",
        "garbage",
        r#"not-an-ip - - [10/Oct/2023:13:55:36] "GET / HTTP/1.1" 200 1"#,
        r#"203.0.113.5 - - [10/Oct/2023:13:55:36] "GET /" 200 1"#,
        r#"203.0.113.5 - - [10/Oct/2023:13:55:36] "GET / HTTP/1.1" abc 1"#,
        r#"203.0.113.5 - - [10/Oct/2023:13:55:36] "GET / HTTP/1.1" 99999 1"#,
    ] {
        assert_eq!(parse_line(line), None, "{line:?} should not parse");
    }
}

#[test]
fn unparseable_log_time_still_yields_the_line() {
    let line = r#"203.0.113.5 - - [yesterday] "GET / HTTP/1.1" 200 10"#;

    let parsed = parse_line(line).unwrap();

    assert_eq!(parsed.log_time, None);
    assert_eq!(parse_log_time("yesterday"), None);
}

#[test]
fn parsed_line_becomes_a_log_origin_event() {
    let line = r#"203.0.113.5 - - [10/Oct/2023:13:55:36] "DELETE /items/4 HTTP/1.1" 404 0"#;

    let event = parse_line(line).unwrap().into_raw_event();

    assert_eq!(event.origin, EventOrigin::Log);
    assert_eq!(event.method, "DELETE");
    assert_eq!(event.status_code, Some(404));
    assert_eq!(event.response_size, Some(0));
}
