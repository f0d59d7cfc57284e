//! Minimal metrics registry for the server.
//!
//! Labelled counters are backed by `DashMap`; labels are flattened into
//! sorted key vectors so rendering order within a series is deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use masgo_core::{Metric, MetricValue};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(labels: &[(String, String)]) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Prometheus spelling of a float sample.
fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 {
            "+Inf".into()
        } else {
            "-Inf".into()
        }
    } else {
        v.to_string()
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one label set (0 if never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();
        self.map
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (labels, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
        }
    }
}

#[derive(Default)]
pub struct ServerMetrics {
    /// Update requests by `kind` and `outcome`.
    pub updates: CounterVec,
}

impl ServerMetrics {
    /// Record one update request outcome.
    pub fn record_update(&self, kind: &str, outcome: &str) {
        self.updates.inc(&[("kind", kind), ("outcome", outcome)]);
    }

    /// Render server counters followed by the stored metric values.
    pub fn render(&self, stored: &[Metric]) -> String {
        let mut out = String::new();
        self.updates.render("masgo_updates_total", &mut out);

        let _ = writeln!(out, "# TYPE masgo_gauge gauge");
        for m in stored {
            if let MetricValue::Gauge(v) = m.value() {
                let _ = writeln!(
                    out,
                    "masgo_gauge{{name=\"{}\"}} {}",
                    escape_label(m.name()),
                    fmt_float(v)
                );
            }
        }

        let _ = writeln!(out, "# TYPE masgo_counter counter");
        for m in stored {
            if let MetricValue::Counter(v) = m.value() {
                let _ = writeln!(
                    out,
                    "masgo_counter{{name=\"{}\"}} {}",
                    escape_label(m.name()),
                    v
                );
            }
        }
        out
    }
}
