//! Statistics aggregation
//!
//! The aggregator is the only mutable state shared between workers. Each
//! worker merges its `WorkerResult` exactly once, under a single mutex, after
//! its loop ends; the coordinator reads the totals only after every worker has
//! been joined.
//!
//! # Example
//!
//! ```
//! use recbench::stats::{aggregator::StatsAggregator, WorkerResult};
//!
//! let aggregator = StatsAggregator::new();
//! let mut result = WorkerResult::new(0);
//! result.ops = 7;
//! aggregator.merge(&result)?;
//! assert_eq!(aggregator.snapshot().total_ops, 7);
//! # Ok::<(), recbench::error::BenchError>(())
//! ```

use crate::stats::{SessionStats, WorkerResult};
use crate::Result;
use std::sync::{Mutex, MutexGuard};

/// Mutex-guarded session totals
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: Mutex<SessionStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionStats> {
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Merge one worker's result: counters summed, elapsed = max
    pub fn merge(&self, result: &WorkerResult) -> Result<()> {
        let mut stats = self.lock();
        stats.merge(result)?;
        tracing::debug!(
            worker = result.worker_id,
            ops = result.ops,
            bytes = result.bytes,
            elapsed_ns = result.elapsed_ns,
            "merged worker result"
        );
        Ok(())
    }

    /// Copy of the current totals
    pub fn snapshot(&self) -> SessionStats {
        self.lock().clone()
    }

    /// Consume the aggregator and return the totals
    pub fn into_stats(self) -> SessionStats {
        self.stats
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
