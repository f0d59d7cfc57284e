//! Outbound update client.
//!
//! One `POST {base}/update/{type}/{name}/{value}` per metric with an empty
//! `text/plain` body. Failures of individual sends are logged and skipped;
//! they never abort a batch.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use masgo_core::error::{MasgoError, Result};
use masgo_core::{Metric, MetricValue};

use crate::collector::Snapshot;

const CONTENT_TYPE_TEXT_PLAIN: &str = "text/plain";

/// Bytes escaped in a metric name so it stays a single path segment.
const NAME_PCT_ENCODING_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Path-encoded update URL for `metric`.
///
/// The name is percent-encoded. Gauges carry six fractional digits, counters
/// are plain base-10 integers.
pub fn update_url(base: &str, metric: &Metric) -> String {
    let base = base.trim_end_matches('/');
    let kind = metric.kind();
    let name = utf8_percent_encode(metric.name(), NAME_PCT_ENCODING_SET);
    match metric.value() {
        MetricValue::Gauge(v) => format!("{base}/update/{kind}/{name}/{v:.6}"),
        MetricValue::Counter(v) => format!("{base}/update/{kind}/{name}/{v}"),
    }
}

/// Outcome of one reporting pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub sent: usize,
    pub failed: usize,
}

pub struct Reporter {
    client: Client,
    base: String,
}

impl Reporter {
    pub fn new(server_address: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MasgoError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            base: server_address.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Submit a single update. Non-2xx responses are transport errors.
    pub async fn send(&self, metric: &Metric) -> Result<()> {
        let url = update_url(&self.base, metric);
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, CONTENT_TYPE_TEXT_PLAIN)
            .body("")
            .send()
            .await
            .map_err(|e| MasgoError::Transport(format!("POST {url}: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(%url, %status, "metric sent");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(MasgoError::Transport(format!(
            "POST {url}: {status}: {}",
            body.trim()
        )))
    }

    /// Send every metric of `snapshot`, gauges first and `PollCount` last.
    pub async fn report(&self, snapshot: &Snapshot) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for metric in snapshot.metrics() {
            match self.send(&metric).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(name = %metric.name(), error = %e, "error sending metric");
                }
            }
        }
        tracing::info!(
            sent = summary.sent,
            failed = summary.failed,
            poll_count = snapshot.poll_count,
            "report finished"
        );
        summary
    }
}
