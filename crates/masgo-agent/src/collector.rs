//! Runtime statistics sampling.
//!
//! Every gauge the agent reports is listed in [`RUNTIME_GAUGES`] as a
//! `(name, accessor)` pair over [`RuntimeStats`], plus one pseudo-random
//! [`RANDOM_VALUE`]. The sampler also owns the monotonic poll counter that is
//! reported as the [`POLL_COUNT`] counter.

use sysinfo::{Pid, System};

use masgo_core::Metric;

/// Counter carrying the number of samples taken so far.
pub const POLL_COUNT: &str = "PollCount";
/// Gauge carrying a fresh pseudo-random value in `[0, 1)` per sample.
pub const RANDOM_VALUE: &str = "RandomValue";

/// Raw statistics read on one tick. Memory figures are in bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeStats {
    pub process_resident_memory: u64,
    pub process_virtual_memory: u64,
    pub process_cpu_usage: f32,
    pub process_run_time_secs: u64,
    pub process_disk_read_bytes: u64,
    pub process_disk_written_bytes: u64,
    pub total_memory: u64,
    pub used_memory: u64,
    pub available_memory: u64,
    pub free_memory: u64,
    pub total_swap: u64,
    pub used_swap: u64,
}

type Accessor = fn(&RuntimeStats) -> f64;

/// Reported gauges and how each is read from a [`RuntimeStats`].
pub const RUNTIME_GAUGES: &[(&str, Accessor)] = &[
    ("ProcessResidentMemory", |s: &RuntimeStats| s.process_resident_memory as f64),
    ("ProcessVirtualMemory", |s: &RuntimeStats| s.process_virtual_memory as f64),
    ("ProcessCpuUsage", |s: &RuntimeStats| s.process_cpu_usage.max(0.0) as f64),
    ("ProcessRunTime", |s: &RuntimeStats| s.process_run_time_secs as f64),
    ("ProcessDiskReadBytes", |s: &RuntimeStats| s.process_disk_read_bytes as f64),
    ("ProcessDiskWrittenBytes", |s: &RuntimeStats| s.process_disk_written_bytes as f64),
    ("TotalMemory", |s: &RuntimeStats| s.total_memory as f64),
    ("UsedMemory", |s: &RuntimeStats| s.used_memory as f64),
    ("AvailableMemory", |s: &RuntimeStats| s.available_memory as f64),
    ("FreeMemory", |s: &RuntimeStats| s.free_memory as f64),
    ("TotalSwap", |s: &RuntimeStats| s.total_swap as f64),
    ("UsedSwap", |s: &RuntimeStats| s.used_swap as f64),
];

/// Values produced by one sampling tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub gauges: Vec<(&'static str, f64)>,
    pub poll_count: i64,
}

impl Snapshot {
    /// Outbound updates for this snapshot: every gauge, then `PollCount`.
    pub fn metrics(&self) -> Vec<Metric> {
        self.gauges
            .iter()
            .map(|&(name, v)| Metric::gauge(name, v))
            .chain(std::iter::once(Metric::counter(POLL_COUNT, self.poll_count)))
            .collect()
    }
}

pub struct Sampler {
    system: System,
    pid: Option<Pid>,
    poll_count: i64,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "process statistics unavailable");
                None
            }
        };
        Self {
            system: System::new(),
            pid,
            poll_count: 0,
        }
    }

    /// Number of samples taken so far.
    pub fn poll_count(&self) -> i64 {
        self.poll_count
    }

    fn read_stats(&mut self) -> RuntimeStats {
        self.system.refresh_memory();

        let mut stats = RuntimeStats {
            total_memory: self.system.total_memory(),
            used_memory: self.system.used_memory(),
            available_memory: self.system.available_memory(),
            free_memory: self.system.free_memory(),
            total_swap: self.system.total_swap(),
            used_swap: self.system.used_swap(),
            ..RuntimeStats::default()
        };

        if let Some(pid) = self.pid {
            if self.system.refresh_process(pid) {
                if let Some(p) = self.system.process(pid) {
                    let disk = p.disk_usage();
                    stats.process_resident_memory = p.memory();
                    stats.process_virtual_memory = p.virtual_memory();
                    stats.process_cpu_usage = p.cpu_usage();
                    stats.process_run_time_secs = p.run_time();
                    stats.process_disk_read_bytes = disk.total_read_bytes;
                    stats.process_disk_written_bytes = disk.total_written_bytes;
                }
            }
        }

        stats
    }

    /// Take one sample and advance the poll counter.
    pub fn sample(&mut self) -> Snapshot {
        let stats = self.read_stats();

        let mut gauges: Vec<(&'static str, f64)> = RUNTIME_GAUGES
            .iter()
            .map(|&(name, read)| (name, read(&stats)))
            .collect();
        gauges.push((RANDOM_VALUE, rand::random::<f64>()));

        self.poll_count += 1;
        tracing::trace!(poll_count = self.poll_count, gauges = gauges.len(), "sampled");

        Snapshot {
            gauges,
            poll_count: self.poll_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_read_their_own_field() {
        let stats = RuntimeStats {
            used_memory: 42,
            process_cpu_usage: -1.0,
            ..RuntimeStats::default()
        };
        let read = |name: &str| {
            RUNTIME_GAUGES
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, f)| f(&stats))
        };
        assert_eq!(read("UsedMemory"), Some(42.0));
        assert_eq!(read("ProcessCpuUsage"), Some(0.0));
        assert_eq!(read("Nope"), None);
    }
}
