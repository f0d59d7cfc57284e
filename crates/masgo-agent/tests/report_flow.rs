//! Agent -> server flow against a real listener.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use masgo_agent::collector::{Sampler, POLL_COUNT, RANDOM_VALUE, RUNTIME_GAUGES};
use masgo_agent::config::AgentSection;
use masgo_agent::reporter::Reporter;
use masgo_agent::runner;
use masgo_core::{MasgoError, MemStorage, Metric, MetricKind, MetricValue, Repository};
use masgo_server::{app_state::AppState, config::ServerConfig, router};

async fn spawn_server() -> (String, Arc<MemStorage>) {
    let store = Arc::new(MemStorage::new());
    let state = AppState::with_store(ServerConfig::default(), store.clone());
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), store)
}

/// Address nothing listens on.
async fn closed_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn report_sends_gauges_then_poll_count() {
    let (base, store) = spawn_server().await;
    let reporter = Reporter::new(&base, Duration::from_secs(5)).unwrap();

    let mut sampler = Sampler::new();
    sampler.sample();
    let snap = sampler.sample();

    let summary = reporter.report(&snap).await;
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.sent, RUNTIME_GAUGES.len() + 2);

    for (name, _) in RUNTIME_GAUGES {
        assert!(store.get(MetricKind::Gauge, name).is_some(), "missing {name}");
    }
    assert!(store.get(MetricKind::Gauge, RANDOM_VALUE).is_some());
    assert_eq!(store.get(MetricKind::Counter, POLL_COUNT), Some(MetricValue::Counter(2)));

    // The server accumulates whatever counter value the agent sends.
    reporter.report(&snap).await;
    assert_eq!(store.get(MetricKind::Counter, POLL_COUNT), Some(MetricValue::Counter(4)));
}

#[tokio::test]
async fn gauge_value_survives_the_wire() {
    let (base, store) = spawn_server().await;
    let reporter = Reporter::new(&base, Duration::from_secs(5)).unwrap();

    reporter.send(&Metric::gauge("Alloc", 2.75)).await.unwrap();
    assert_eq!(store.get(MetricKind::Gauge, "Alloc"), Some(MetricValue::Gauge(2.75)));
}

#[tokio::test]
async fn names_with_reserved_characters_survive_the_wire() {
    let (base, store) = spawn_server().await;
    let reporter = Reporter::new(&base, Duration::from_secs(5)).unwrap();

    reporter.send(&Metric::gauge("my metric", 1.0)).await.unwrap();
    reporter.send(&Metric::counter("50%", 3)).await.unwrap();

    assert_eq!(store.get(MetricKind::Gauge, "my metric"), Some(MetricValue::Gauge(1.0)));
    assert_eq!(store.get(MetricKind::Counter, "50%"), Some(MetricValue::Counter(3)));
}

#[tokio::test]
async fn rejected_update_is_a_transport_error() {
    let (base, store) = spawn_server().await;
    let reporter = Reporter::new(&base, Duration::from_secs(5)).unwrap();

    let bad = Metric::new(MetricKind::Counter, "x", MetricValue::Gauge(1.5));
    let err = reporter.send(&bad).await.unwrap_err();
    assert!(matches!(err, MasgoError::Transport(_)));
    assert!(err.to_string().contains("400"));
    assert!(err.to_string().contains("invalid counter value"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn unreachable_server_does_not_abort_the_batch() {
    let base = closed_address().await;
    let reporter = Reporter::new(&base, Duration::from_millis(500)).unwrap();

    let snap = Sampler::new().sample();
    let summary = reporter.report(&snap).await;
    assert_eq!(summary.sent, 0);
    assert_eq!(summary.failed, snap.gauges.len() + 1);
}

#[tokio::test]
async fn loops_report_until_shutdown() {
    let (base, store) = spawn_server().await;
    let cfg = AgentSection {
        server_address: base,
        poll_interval_ms: 20,
        report_interval_ms: 60,
        request_timeout_ms: 1000,
    };
    let (tx, rx) = watch::channel(false);

    let (res, _) = tokio::join!(runner::run(&cfg, rx), async {
        tokio::time::sleep(Duration::from_millis(400)).await;
        tx.send(true).unwrap();
    });
    res.unwrap();

    match store.get(MetricKind::Counter, POLL_COUNT) {
        Some(MetricValue::Counter(n)) => assert!(n > 0),
        other => panic!("unexpected PollCount: {other:?}"),
    }
    assert!(store.get(MetricKind::Gauge, RANDOM_VALUE).is_some());
}
