//! Update request validation.
//!
//! Canonical path convention: leading and trailing `/` are trimmed and the
//! remainder must split into exactly `update/{type}/{name}/{value}`.
//! [`validate_url`] and the endpoint share [`parse_update_path`], so the
//! segments checked are the segments used.

use crate::error::{MasgoError, Result};
use crate::metric::{Metric, MetricKind, MetricValue};

/// The only method accepted for update submission.
pub const UPDATE_METHOD: &str = "POST";
/// First path segment of an update.
pub const UPDATE_SEGMENT: &str = "update";

const SEPARATOR: char = '/';

/// Raw segments of an update path, borrowed from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePath<'a> {
    pub kind: &'a str,
    pub name: &'a str,
    pub value: &'a str,
}

/// Split an update path into its raw segments.
///
/// Fails with `NotFound` unless the trimmed path has exactly four segments
/// starting with `update`, and with `NameRequired` if the name is empty.
pub fn parse_update_path(path: &str) -> Result<UpdatePath<'_>> {
    let mut parts = path.trim_matches(SEPARATOR).split(SEPARATOR);

    let (Some(head), Some(kind), Some(name), Some(value), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(MasgoError::NotFound);
    };

    if head != UPDATE_SEGMENT {
        return Err(MasgoError::NotFound);
    }
    if name.is_empty() {
        return Err(MasgoError::NameRequired);
    }

    Ok(UpdatePath { kind, name, value })
}

/// Check method and path shape of an update request.
pub fn validate_url(method: &str, path: &str) -> Result<()> {
    if method != UPDATE_METHOD {
        return Err(MasgoError::MethodNotAllowed);
    }
    parse_update_path(path).map(|_| ())
}

/// Turn raw `(type, name, value)` strings into a typed [`Metric`].
///
/// Checks run in a fixed order: name, then type, then value.
pub fn validate_metric(kind: &str, name: &str, value: &str) -> Result<Metric> {
    if name.is_empty() {
        return Err(MasgoError::NameRequired);
    }

    let kind: MetricKind = kind.parse()?;
    let value = match kind {
        MetricKind::Gauge => value
            .parse::<f64>()
            .map(MetricValue::Gauge)
            .map_err(|_| MasgoError::InvalidGaugeValue)?,
        MetricKind::Counter => value
            .parse::<i64>()
            .map(MetricValue::Counter)
            .map_err(|_| MasgoError::InvalidCounterValue)?,
    };

    Ok(Metric::new(kind, name, value))
}

impl UpdatePath<'_> {
    /// Validate the raw segments into a typed metric.
    pub fn to_metric(&self) -> Result<Metric> {
        validate_metric(self.kind, self.name, self.value)
    }
}
