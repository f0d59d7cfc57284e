//! Polling and reporting loops.
//!
//! The two loops run on independent intervals and share only the latest
//! snapshot through a `watch` channel: a slow report never delays sampling,
//! and sampling never queues work for the reporter.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use masgo_core::error::Result;

use crate::collector::{Sampler, Snapshot};
use crate::config::AgentSection;
use crate::reporter::Reporter;

/// Returns true once shutdown was requested or the sender is gone.
async fn stopped(shutdown: &mut watch::Receiver<bool>) -> bool {
    match shutdown.changed().await {
        Ok(()) => *shutdown.borrow(),
        Err(_) => true,
    }
}

/// Sample every `every`, publishing each snapshot as the latest one.
pub async fn poll_loop(
    mut sampler: Sampler,
    every: Duration,
    latest: watch::Sender<Option<Snapshot>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tick = interval(every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                latest.send_replace(Some(sampler.sample()));
            }
            stop = stopped(&mut shutdown) => {
                if stop { break; }
            }
        }
    }
    tracing::debug!(poll_count = sampler.poll_count(), "poll loop stopped");
}

/// Every `every`, report the most recent snapshot (if any yet).
pub async fn report_loop(
    reporter: Reporter,
    every: Duration,
    latest: watch::Receiver<Option<Snapshot>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tick = interval_at(Instant::now() + every, every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let snapshot = latest.borrow().clone();
                match snapshot {
                    Some(s) => { reporter.report(&s).await; }
                    None => tracing::debug!("nothing sampled yet"),
                }
            }
            stop = stopped(&mut shutdown) => {
                if stop { break; }
            }
        }
    }
    tracing::debug!("report loop stopped");
}

/// Run both loops until `shutdown` flips to true.
pub async fn run(cfg: &AgentSection, shutdown: watch::Receiver<bool>) -> Result<()> {
    let reporter = Reporter::new(&cfg.server_address, cfg.request_timeout())?;
    let (tx, rx) = watch::channel(None);

    tracing::info!(
        server = %reporter.base(),
        poll_interval_ms = cfg.poll_interval_ms,
        report_interval_ms = cfg.report_interval_ms,
        "starting collection loops"
    );

    tokio::join!(
        poll_loop(Sampler::new(), cfg.poll_interval(), tx, shutdown.clone()),
        report_loop(reporter, cfg.report_interval(), rx, shutdown),
    );
    Ok(())
}
