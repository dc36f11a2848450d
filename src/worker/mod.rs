//! Worker thread implementation
//!
//! A `Worker` is the unit of execution: it owns a planner, an executor (and
//! with it the I/O buffer) and a random source, and repeats
//! plan → execute → record until its time budget runs out.
//!
//! # Lifecycle
//!
//! 1. **Creation**: `Worker::new()` allocates the buffer and seeds the planner
//! 2. **Execution**: `run()` loops over iterations
//! 3. **Completion**: returns a `WorkerResult` for the aggregator
//!
//! Workers share only the read-only catalog and bounds; everything mutable is
//! thread-local.
//!
//! # Example
//!
//! ```no_run
//! use recbench::plan::bounds::{Bound, BoundsResolver, ScanShape};
//! use recbench::target::FileCatalog;
//! use recbench::worker::{Worker, WorkerSetup, Workload};
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let catalog = Arc::new(FileCatalog::build(Path::new("/data/set"), 4096)?);
//! let bounds = BoundsResolver::new(catalog.len())
//!     .resolve(&Bound::all(), &Bound::all(), ScanShape::default())?;
//! let setup = WorkerSetup {
//!     catalog,
//!     bounds,
//!     workload: Workload::Scan,
//!     buffered: true,
//!     block_size: 4096,
//!     max_time: Duration::from_secs(1),
//!     seed: None,
//! };
//! let result = Worker::new(0, &setup)?.run()?;
//! println!("worker 0: {} ops", result.ops);
//! # Ok::<(), recbench::error::BenchError>(())
//! ```

use crate::distribution::uniform::UniformSource;
use crate::engine::IoExecutor;
use crate::plan::bounds::ResolvedBounds;
use crate::plan::AccessPlanner;
use crate::stats::WorkerResult;
use crate::target::FileCatalog;
use crate::util::align::alignment_unit;
use crate::util::time::{Budget, Timer};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Kind of iteration a worker repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
    /// One record from a random position of a random file
    Lookup,
    /// Extents from a random subset of files
    Scan,
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workload::Lookup => f.write_str("lookup"),
            Workload::Scan => f.write_str("scan"),
        }
    }
}

/// Everything a worker needs, shared read-only across workers
#[derive(Debug, Clone)]
pub struct WorkerSetup {
    pub catalog: Arc<FileCatalog>,
    pub bounds: ResolvedBounds,
    pub workload: Workload,
    pub buffered: bool,
    pub block_size: u64,
    pub max_time: Duration,
    /// Base seed; worker `i` uses `seed + i`. Entropy when unset.
    pub seed: Option<u64>,
}

impl WorkerSetup {
    pub fn record_size(&self) -> u64 {
        self.catalog.record_size()
    }

    /// Alignment unit for offsets and lengths
    pub fn unit(&self) -> u64 {
        alignment_unit(self.buffered, self.record_size(), self.block_size)
    }
}

/// Worker that executes one workload until its budget runs out
pub struct Worker {
    id: usize,
    workload: Workload,
    max_time: Duration,
    planner: AccessPlanner<UniformSource>,
    executor: IoExecutor,
}

impl Worker {
    pub fn new(id: usize, setup: &WorkerSetup) -> Result<Self> {
        let rng = match setup.seed {
            Some(seed) => UniformSource::with_seed(seed.wrapping_add(id as u64)),
            None => UniformSource::new(),
        };
        let executor = IoExecutor::new(setup.buffered, setup.record_size(), setup.block_size)?;
        let planner = AccessPlanner::new(
            Arc::clone(&setup.catalog),
            setup.bounds,
            setup.unit(),
            rng,
        );

        Ok(Self {
            id,
            workload: setup.workload,
            max_time: setup.max_time,
            planner,
            executor,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Run iterations until the budget is exhausted
    ///
    /// At least one iteration is always started. An iteration cut short by
    /// the budget still counts as an op, with whatever bytes it read.
    pub fn run(&mut self) -> Result<WorkerResult> {
        let mut result = WorkerResult::new(self.id);
        let record_size = self.planner.catalog().record_size();
        let mut budget = Budget::start(self.max_time);
        let mut iteration = Timer::new();

        tracing::debug!(worker = self.id, workload = %self.workload, "worker started");

        loop {
            iteration.start();
            let plan = match self.workload {
                Workload::Lookup => self.planner.plan_lookup(),
                Workload::Scan => self.planner.plan_scan(),
            };

            let catalog = Arc::clone(self.planner.catalog_arc());
            let outcome = self
                .executor
                .execute(&catalog, &plan, self.planner.rng_mut(), &mut budget)?;
            result.latency.record_ns(iteration.stop());

            result.ops += 1;
            result.bytes += outcome.bytes;
            result.files += outcome.files_opened;
            if self.workload == Workload::Lookup {
                result.records += 1;
            }

            if outcome.budget_exceeded || budget.exceeded() {
                break;
            }
        }

        if self.workload == Workload::Scan {
            result.records = result.bytes / record_size;
        }
        result.elapsed_ns = budget.finish();

        tracing::debug!(
            worker = self.id,
            ops = result.ops,
            bytes = result.bytes,
            elapsed_ns = result.elapsed_ns,
            "worker finished"
        );
        Ok(result)
    }
}
