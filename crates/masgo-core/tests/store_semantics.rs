//! Metric store merge semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use masgo_core::{MasgoError, MemStorage, Metric, MetricKind, MetricValue, Repository};

#[test]
fn gauge_last_write_wins() {
    let s = MemStorage::new();
    s.update(Metric::gauge("Alloc", 1.5)).unwrap();
    s.update(Metric::gauge("Alloc", 2.75)).unwrap();
    assert_eq!(s.get(MetricKind::Gauge, "Alloc"), Some(MetricValue::Gauge(2.75)));
    assert_eq!(s.len(), 1);
}

#[test]
fn counter_accumulates() {
    let s = MemStorage::new();
    s.update(Metric::counter("PollCount", 3)).unwrap();
    s.update(Metric::counter("PollCount", 4)).unwrap();
    assert_eq!(s.get(MetricKind::Counter, "PollCount"), Some(MetricValue::Counter(7)));
}

#[test]
fn counter_accepts_negative_deltas() {
    let s = MemStorage::new();
    s.update(Metric::counter("c", 10)).unwrap();
    s.update(Metric::counter("c", -4)).unwrap();
    assert_eq!(s.get(MetricKind::Counter, "c"), Some(MetricValue::Counter(6)));
}

#[test]
fn same_name_in_different_kinds_is_independent() {
    let s = MemStorage::new();
    s.update(Metric::gauge("x", 1.25)).unwrap();
    s.update(Metric::counter("x", 2)).unwrap();
    assert_eq!(s.get(MetricKind::Gauge, "x"), Some(MetricValue::Gauge(1.25)));
    assert_eq!(s.get(MetricKind::Counter, "x"), Some(MetricValue::Counter(2)));
}

#[test]
fn counter_with_float_payload_leaves_store_untouched() {
    let s = MemStorage::new();
    s.update(Metric::counter("c", 1)).unwrap();

    let bad = Metric::new(MetricKind::Counter, "c", MetricValue::Gauge(2.5));
    let err = s.update(bad).unwrap_err();
    assert!(matches!(err, MasgoError::InvalidCounterValueType));
    assert_eq!(s.get(MetricKind::Counter, "c"), Some(MetricValue::Counter(1)));

    let fresh = Metric::new(MetricKind::Counter, "fresh", MetricValue::Gauge(1.0));
    assert!(s.update(fresh).is_err());
    assert_eq!(s.get(MetricKind::Counter, "fresh"), None);
}

#[test]
fn gauge_with_integer_payload_is_stored_as_float() {
    let s = MemStorage::new();
    s.update(Metric::new(MetricKind::Gauge, "g", MetricValue::Counter(3)))
        .unwrap();
    assert_eq!(s.get(MetricKind::Gauge, "g"), Some(MetricValue::Gauge(3.0)));
}

#[test]
fn snapshot_is_ordered_by_kind_then_name() {
    let s = MemStorage::new();
    s.update(Metric::counter("b", 1)).unwrap();
    s.update(Metric::gauge("z", 1.0)).unwrap();
    s.update(Metric::gauge("a", 2.0)).unwrap();

    let names: Vec<(MetricKind, String)> = s
        .snapshot()
        .into_iter()
        .map(|m| (m.kind(), m.name().to_string()))
        .collect();
    assert_eq!(
        names,
        vec![
            (MetricKind::Gauge, "a".to_string()),
            (MetricKind::Gauge, "z".to_string()),
            (MetricKind::Counter, "b".to_string()),
        ]
    );
}

#[test]
fn concurrent_counter_updates_are_not_lost() {
    let s = Arc::new(MemStorage::new());

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let s = Arc::clone(&s);
            thread::spawn(move || s.update(Metric::counter("hits", 1)).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(s.get(MetricKind::Counter, "hits"), Some(MetricValue::Counter(100)));
}
