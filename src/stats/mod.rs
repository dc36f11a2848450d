//! Statistics collection
//!
//! Workers count into a thread-local `WorkerResult` and hand it to the
//! `StatsAggregator` once, after their loop ends. The aggregate is a
//! `SessionStats`: counters are summed, elapsed time is the slowest worker's,
//! and the latency histograms are merged.
//!
//! # Example
//!
//! ```
//! use recbench::stats::{SessionStats, WorkerResult};
//!
//! let mut a = WorkerResult::new(0);
//! a.ops = 10;
//! a.bytes = 40_960;
//! a.elapsed_ns = 2_000_000_000;
//!
//! let mut b = WorkerResult::new(1);
//! b.ops = 5;
//! b.bytes = 20_480;
//! b.elapsed_ns = 1_000_000_000;
//!
//! let mut stats = SessionStats::default();
//! stats.merge(&a)?;
//! stats.merge(&b)?;
//! assert_eq!(stats.total_ops, 15);
//! assert_eq!(stats.max_elapsed_ns, 2_000_000_000);
//! assert_eq!(stats.bytes_per_sec(), 30_720.0);
//! # Ok::<(), recbench::error::BenchError>(())
//! ```

pub mod aggregator;
pub mod histogram;

use crate::util::time::per_second;
use crate::Result;
use histogram::LatencyHistogram;
use serde::Serialize;
use std::time::Duration;

/// Counters one worker accumulates over its run
#[derive(Debug, Clone, Default)]
pub struct WorkerResult {
    pub worker_id: usize,
    /// Completed (or budget-interrupted) iterations
    pub ops: u64,
    pub bytes: u64,
    pub records: u64,
    /// Files opened
    pub files: u64,
    pub elapsed_ns: u64,
    /// Wall time of each iteration
    pub latency: LatencyHistogram,
}

impl WorkerResult {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }
}

/// Aggregated result of a whole session
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub workers: usize,
    pub total_ops: u64,
    pub total_bytes: u64,
    pub total_records: u64,
    pub total_files: u64,
    pub max_elapsed_ns: u64,
    pub latency: LatencyHistogram,
}

impl SessionStats {
    /// Fold one worker's result into the session totals
    pub fn merge(&mut self, result: &WorkerResult) -> Result<()> {
        self.latency.merge(&result.latency)?;
        self.workers += 1;
        self.total_ops += result.ops;
        self.total_bytes += result.bytes;
        self.total_records += result.records;
        self.total_files += result.files;
        self.max_elapsed_ns = self.max_elapsed_ns.max(result.elapsed_ns);
        Ok(())
    }

    /// Bytes per second over the slowest worker's elapsed time
    pub fn bytes_per_sec(&self) -> f64 {
        per_second(self.total_bytes, self.max_elapsed_ns)
    }

    pub fn records_per_sec(&self) -> f64 {
        per_second(self.total_records, self.max_elapsed_ns)
    }

    pub fn ops_per_sec(&self) -> f64 {
        per_second(self.total_ops, self.max_elapsed_ns)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.max_elapsed_ns)
    }

    pub fn latency_summary(&self) -> LatencySummary {
        LatencySummary::from_histogram(&self.latency)
    }
}

/// Latency figures reported at the end of a run, in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    pub samples: u64,
    pub min_ns: Option<u64>,
    pub mean_ns: Option<u64>,
    pub max_ns: Option<u64>,
    pub p50_ns: Option<u64>,
    pub p90_ns: Option<u64>,
    pub p99_ns: Option<u64>,
    pub p999_ns: Option<u64>,
}

impl LatencySummary {
    pub fn from_histogram(hist: &LatencyHistogram) -> Self {
        let ns = |d: Option<Duration>| d.map(|d| d.as_nanos() as u64);
        Self {
            samples: hist.len(),
            min_ns: ns(hist.min()),
            mean_ns: ns(hist.mean()),
            max_ns: ns(hist.max()),
            p50_ns: ns(hist.percentile(50.0)),
            p90_ns: ns(hist.percentile(90.0)),
            p99_ns: ns(hist.percentile(99.0)),
            p999_ns: ns(hist.percentile(99.9)),
        }
    }
}
