use crate::event::{Frame, encode_event};
use crate::hub::{BroadcastHub, PublishReport};
use crate::test_support::enriched;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn frame(seq: u32) -> Frame {
    encode_event(&enriched(seq)).unwrap()
}

fn init() -> Frame {
    Frame::from(r#"{"type":"init","data":[]}"#)
}

#[tokio::test]
async fn initial_frame_is_delivered_before_any_live_frame() {
    let hub = Arc::new(BroadcastHub::new(8));
    let mut sub = hub.subscribe(init());

    hub.publish(&frame(1));

    assert_eq!(sub.recv().await.unwrap(), init());
    assert_eq!(sub.recv().await.unwrap(), frame(1));
}

#[tokio::test]
async fn every_subscriber_sees_publishes_in_the_same_order() {
    let hub = Arc::new(BroadcastHub::new(16));
    let mut a = hub.subscribe(init());
    let mut b = hub.subscribe(init());

    for seq in 0..5 {
        hub.publish(&frame(seq));
    }

    for sub in [&mut a, &mut b] {
        assert_eq!(sub.recv().await.unwrap(), init());
        for seq in 0..5 {
            assert_eq!(sub.recv().await.unwrap(), frame(seq));
        }
    }
}

#[tokio::test]
async fn closed_subscriber_is_removed_and_others_still_receive() {
    // Arrange
    let hub = Arc::new(BroadcastHub::new(8));
    let mut healthy = hub.subscribe(init());
    let mut broken = hub.subscribe(init());
    let broken_id = broken.id();
    broken.close();

    // Act
    let report = hub.publish(&frame(1));

    // Assert
    assert_eq!(
        report,
        PublishReport {
            delivered: 1,
            removed: 1
        }
    );
    assert!(!hub.contains(broken_id));
    assert!(hub.contains(healthy.id()));
    assert_eq!(healthy.recv().await.unwrap(), init());
    assert_eq!(healthy.recv().await.unwrap(), frame(1));
}

#[tokio::test]
async fn lagging_subscriber_is_disconnected() {
    let hub = Arc::new(BroadcastHub::new(2));
    let mut slow = hub.subscribe(init());

    // Buffer holds init + one frame; the next publish overflows it.
    hub.publish(&frame(1));
    let report = hub.publish(&frame(2));

    assert_eq!(report.removed, 1);
    assert!(hub.is_empty());

    // Already-queued frames drain, then the channel ends.
    assert_eq!(slow.recv().await.unwrap(), init());
    assert_eq!(slow.recv().await.unwrap(), frame(1));
    assert!(slow.recv().await.is_none());
}

#[test]
fn unsubscribe_is_idempotent() {
    let hub = Arc::new(BroadcastHub::new(4));
    let sub = hub.subscribe(init());
    let id = sub.id();

    assert!(hub.unsubscribe(id));
    assert!(!hub.unsubscribe(id));

    // Guard drop after explicit removal is a no-op.
    drop(sub);
    assert!(hub.is_empty());
}

#[test]
fn dropping_subscription_unregisters_it() {
    let hub = Arc::new(BroadcastHub::new(4));
    let first = hub.subscribe(init());
    let _second = hub.subscribe(init());
    assert_eq!(hub.len(), 2);

    drop(first);

    assert_eq!(hub.len(), 1);
}

#[tokio::test]
async fn close_all_ends_every_stream() {
    let hub = Arc::new(BroadcastHub::new(4));
    let mut a = hub.subscribe(init());
    let mut b = hub.subscribe(init());

    hub.close_all();

    assert!(hub.is_empty());
    assert_eq!(a.recv().await.unwrap(), init());
    assert!(a.recv().await.is_none());
    assert_eq!(b.recv().await.unwrap(), init());
    assert!(b.recv().await.is_none());
}

#[test]
fn publish_without_subscribers_is_a_no_op() {
    let hub = BroadcastHub::new(4);
    assert_eq!(hub.publish(&frame(1)), PublishReport::default());
}
