//! In-memory metric store.
//!
//! One bucket per [`MetricKind`], each a concurrent map from metric name to
//! its current value. Both buckets exist from construction on and nothing is
//! ever removed. [`Repository::update`] is the only mutating entry point.
//!
//! Concurrency: a counter's read-modify-write runs while holding the map's
//! entry guard for that key, so concurrent deltas to the same name are
//! serialized and none are lost. Gauge writes go through the same per-key
//! locking.

use std::collections::HashMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{MasgoError, Result};
use crate::metric::{Metric, MetricKind, MetricValue};

/// Storage seam used by the update endpoint.
pub trait Repository: Send + Sync {
    /// Merge one update into the stored state.
    fn update(&self, metric: Metric) -> Result<()>;

    /// Current value of `(kind, name)`, if any update has been accepted.
    fn get(&self, kind: MetricKind, name: &str) -> Option<MetricValue>;

    /// All stored metrics ordered by kind, then name.
    fn snapshot(&self) -> Vec<Metric>;
}

/// Process-lifetime metric store.
pub struct MemStorage {
    buckets: HashMap<MetricKind, DashMap<String, MetricValue>>,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStorage {
    /// Create an empty store with every kind bucket present.
    pub fn new() -> Self {
        let buckets = MetricKind::ALL
            .iter()
            .map(|&kind| (kind, DashMap::new()))
            .collect();
        Self { buckets }
    }

    fn bucket(&self, kind: MetricKind) -> Result<&DashMap<String, MetricValue>> {
        self.buckets
            .get(&kind)
            .ok_or(MasgoError::UnknownMetricType(kind))
    }

    /// Number of stored `(kind, name)` entries.
    pub fn len(&self) -> usize {
        self.buckets.values().map(DashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update_gauge(bucket: &DashMap<String, MetricValue>, name: String, value: MetricValue) {
        // Stored gauges are always floats, whatever payload variant arrived.
        let v = match value {
            MetricValue::Gauge(v) => v,
            MetricValue::Counter(v) => v as f64,
        };
        tracing::debug!(kind = "gauge", name = %name, value = v, "metric updated");
        bucket.insert(name, MetricValue::Gauge(v));
    }

    fn update_counter(
        bucket: &DashMap<String, MetricValue>,
        name: String,
        value: MetricValue,
    ) -> Result<()> {
        let delta = value
            .as_counter()
            .ok_or(MasgoError::InvalidCounterValueType)?;

        match bucket.entry(name) {
            Entry::Occupied(mut e) => {
                let current = e
                    .get()
                    .as_counter()
                    .ok_or(MasgoError::InvalidCounterValueType)?;
                // Two's-complement wrap on overflow rather than a panic.
                let next = current.wrapping_add(delta);
                tracing::debug!(
                    kind = "counter",
                    name = %e.key(),
                    current,
                    delta,
                    next,
                    "metric updated"
                );
                e.insert(MetricValue::Counter(next));
            }
            Entry::Vacant(e) => {
                tracing::debug!(
                    kind = "counter",
                    name = %e.key(),
                    current = 0_i64,
                    delta,
                    next = delta,
                    "metric updated"
                );
                e.insert(MetricValue::Counter(delta));
            }
        }
        Ok(())
    }
}

impl Repository for MemStorage {
    fn update(&self, metric: Metric) -> Result<()> {
        let kind = metric.kind();
        let value = metric.value();
        let bucket = self.bucket(kind)?;
        let name = metric.name().to_owned();

        match kind {
            MetricKind::Gauge => {
                Self::update_gauge(bucket, name, value);
                Ok(())
            }
            MetricKind::Counter => Self::update_counter(bucket, name, value),
        }
    }

    fn get(&self, kind: MetricKind, name: &str) -> Option<MetricValue> {
        self.buckets
            .get(&kind)?
            .get(name)
            .map(|v| *v.value())
    }

    fn snapshot(&self) -> Vec<Metric> {
        let mut out: Vec<Metric> = self
            .buckets
            .iter()
            .flat_map(|(&kind, bucket)| {
                bucket
                    .iter()
                    .map(move |e| Metric::new(kind, e.key().clone(), *e.value()))
                    .collect::<Vec<_>>()
            })
            .collect();
        out.sort_by(|a, b| (a.kind(), a.name()).cmp(&(b.kind(), b.name())));
        out
    }
}
