use crate::store::EventStore;
use crate::test_support::{enriched, seq_of};
use pretty_assertions::assert_eq;

fn seqs(store: &EventStore) -> Vec<u32> {
    store.snapshot().iter().map(seq_of).collect()
}

#[test]
fn append_inserts_at_front() {
    let mut store = EventStore::new(10);

    store.append(enriched(1));
    store.append(enriched(2));
    store.append(enriched(3));

    assert_eq!(seqs(&store), vec![3, 2, 1]);
}

#[test]
fn appending_past_capacity_evicts_oldest() {
    // Arrange
    let mut store = EventStore::new(100);

    // Act
    for seq in 0..101 {
        store.append(enriched(seq));
    }

    // Assert
    let snapshot = seqs(&store);
    assert_eq!(snapshot.len(), 100);
    assert_eq!(snapshot[0], 100);
    assert!(!snapshot.contains(&0));
    assert_eq!(*snapshot.last().unwrap(), 1);
}

#[test]
fn length_never_exceeds_capacity_and_order_is_most_recent_first() {
    let mut store = EventStore::new(7);

    for seq in 0..50 {
        store.append(enriched(seq));

        assert!(store.len() <= store.capacity());
        let snapshot = seqs(&store);
        assert!(snapshot.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(snapshot[0], seq);
    }
}

#[test]
fn snapshot_is_not_affected_by_later_appends() {
    let mut store = EventStore::new(3);
    store.append(enriched(1));
    store.append(enriched(2));

    let before = store.snapshot();
    store.append(enriched(3));
    store.append(enriched(4));

    assert_eq!(before.iter().map(seq_of).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(seqs(&store), vec![4, 3, 2]);
}

#[test]
fn zero_capacity_is_treated_as_one() {
    let mut store = EventStore::new(0);
    store.append(enriched(1));
    store.append(enriched(2));

    assert_eq!(store.capacity(), 1);
    assert_eq!(seqs(&store), vec![2]);
}
