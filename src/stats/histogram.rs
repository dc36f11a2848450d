//! Latency histogram using HdrHistogram
//!
//! Each worker records the wall time of every iteration (one lookup, or one
//! whole scan plan) and the aggregator merges the per-worker histograms.
//!
//! # Example
//!
//! ```
//! use recbench::stats::histogram::LatencyHistogram;
//! use std::time::Duration;
//!
//! let mut hist = LatencyHistogram::new();
//! hist.record(Duration::from_micros(100));
//! hist.record(Duration::from_micros(200));
//!
//! let p50 = hist.percentile(50.0);
//! assert!(p50.is_some());
//! ```

use crate::error::BenchError;
use crate::Result;
use hdrhistogram::Histogram;
use std::time::Duration;

/// Highest trackable latency: one hour in nanoseconds
const MAX_LATENCY_NS: u64 = 3_600_000_000_000;

/// Latency histogram wrapper
///
/// Tracks latencies from 1 nanosecond to 1 hour with 3 significant digits of
/// precision (values accurate to within 0.1%).
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_LATENCY_NS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    /// Record a latency sample, clamped to the trackable range
    #[inline]
    pub fn record(&mut self, latency: Duration) {
        self.record_ns(latency.as_nanos().min(MAX_LATENCY_NS as u128) as u64);
    }

    /// Record a latency sample given in nanoseconds
    #[inline]
    pub fn record_ns(&mut self, nanos: u64) {
        let value = nanos.clamp(1, MAX_LATENCY_NS);
        let _ = self.histogram.record(value);
    }

    /// Latency at `percentile` (0.0 - 100.0), or None if empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.value_at_percentile(percentile)))
    }

    pub fn min(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.min()))
    }

    pub fn max(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.max()))
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.mean() as u64))
    }

    /// Number of samples recorded
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }

    /// Merge another histogram into this one
    ///
    /// Used by the aggregator to combine per-worker histograms.
    pub fn merge(&mut self, other: &LatencyHistogram) -> Result<()> {
        self.histogram.add(&other.histogram).map_err(|e| BenchError::Statistics {
            reason: format!("failed to merge histograms: {}", e),
        })
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}
