use crate::event::{EventOrigin, ViewerMessage, encode_event, encode_init};
use crate::test_support::{enriched, seq_of};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[test]
fn live_event_is_a_bare_object_with_viewer_field_names() {
    // Arrange
    let mut event = enriched(4);
    event.raw.status_code = Some(404);

    // Act
    let frame = encode_event(&event).unwrap();
    let value: Value = serde_json::from_str(&frame).unwrap();

    // Assert
    assert_eq!(
        value,
        json!({
            "ip": "203.0.113.5",
            "requestType": "GET",
            "path": "/seq/4",
            "statusCode": 404,
            "timestamp": 1_700_000_000_004_i64,
            "source": "request",
            "lat": 48.85,
            "lng": 2.35,
            "country": "FR",
            "city": "Paris",
        })
    );
}

#[test]
fn init_message_wraps_snapshot_in_type_and_data() {
    let frame = encode_init(&[enriched(2), enriched(1)]).unwrap();
    let value: Value = serde_json::from_str(&frame).unwrap();

    assert_eq!(value["type"], "init");
    assert_eq!(value["data"].as_array().unwrap().len(), 2);
    assert_eq!(value["data"][0]["path"], "/seq/2");
}

#[test]
fn empty_history_still_produces_init_message() {
    let frame = encode_init(&[]).unwrap();
    assert_eq!(&*frame, r#"{"type":"init","data":[]}"#);
}

#[test]
fn decode_distinguishes_init_from_live_event() {
    let init = encode_init(&[enriched(1), enriched(0)]).unwrap();
    let live = encode_event(&enriched(9)).unwrap();

    match ViewerMessage::decode(&init).unwrap() {
        ViewerMessage::Init(events) => {
            assert_eq!(events.iter().map(seq_of).collect::<Vec<_>>(), vec![1, 0]);
        }
        other => panic!("expected init, got {other:?}"),
    }

    match ViewerMessage::decode(&live).unwrap() {
        ViewerMessage::Event(event) => {
            assert_eq!(event, enriched(9));
            assert_eq!(event.raw.origin, EventOrigin::Request);
        }
        other => panic!("expected event, got {other:?}"),
    }
}

#[test]
fn decode_rejects_non_json() {
    assert!(ViewerMessage::decode("not json").is_err());
}
