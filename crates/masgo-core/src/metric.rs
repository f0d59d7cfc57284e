//! Metric data model.
//!
//! A metric is addressed by `(kind, name)` and carries a kind-typed value.
//! `MetricValue` is a tagged union so every consumer matches exhaustively
//! instead of downcasting an opaque payload.

use std::fmt;
use std::str::FromStr;

use crate::error::MasgoError;

/// Closed set of metric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    /// Instantaneous value, last write wins.
    Gauge,
    /// Running sum of all received deltas.
    Counter,
}

impl MetricKind {
    pub const ALL: [MetricKind; 2] = [MetricKind::Gauge, MetricKind::Counter];

    /// Wire spelling used in the update path.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = MasgoError;

    /// Exact, case-sensitive match against the wire spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gauge" => Ok(MetricKind::Gauge),
            "counter" => Ok(MetricKind::Counter),
            _ => Err(MasgoError::InvalidMetricType),
        }
    }
}

/// Kind-typed metric payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Gauge(f64),
    Counter(i64),
}

impl MetricValue {
    /// Kind implied by the payload variant.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Counter(_) => MetricKind::Counter,
        }
    }

    pub fn as_gauge(&self) -> Option<f64> {
        match *self {
            MetricValue::Gauge(v) => Some(v),
            MetricValue::Counter(_) => None,
        }
    }

    pub fn as_counter(&self) -> Option<i64> {
        match *self {
            MetricValue::Counter(v) => Some(v),
            MetricValue::Gauge(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Gauge(v) => write!(f, "{v}"),
            MetricValue::Counter(v) => write!(f, "{v}"),
        }
    }
}

/// A single named, typed update.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    kind: MetricKind,
    name: String,
    value: MetricValue,
}

impl Metric {
    /// Build a metric from its parts.
    ///
    /// `kind` and `value` are kept separately, as they travel on the wire;
    /// the store rejects a counter whose payload is not an integer.
    pub fn new(kind: MetricKind, name: impl Into<String>, value: MetricValue) -> Self {
        Self {
            kind,
            name: name.into(),
            value,
        }
    }

    pub fn gauge(name: impl Into<String>, value: f64) -> Self {
        Self::new(MetricKind::Gauge, name, MetricValue::Gauge(value))
    }

    pub fn counter(name: impl Into<String>, value: i64) -> Self {
        Self::new(MetricKind::Counter, name, MetricValue::Counter(value))
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> MetricValue {
        self.value
    }
}
