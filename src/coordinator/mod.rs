//! Coordinator module
//!
//! A `Session` validates everything up front (catalog, block size, bounds)
//! and then runs its workers: inline when there is one, on their own OS
//! threads otherwise. Worker results are merged into a `StatsAggregator`;
//! the totals are published only once every worker has been joined and none
//! of them failed.
//!
//! # Example
//!
//! ```no_run
//! use recbench::config::{ScanConfig, WorkloadConfig};
//! use recbench::coordinator::Session;
//! use recbench::worker::Workload;
//!
//! let workload = WorkloadConfig {
//!     dir: "/data/set".into(),
//!     threads: 4,
//!     ..Default::default()
//! };
//! let session = Session::new(Workload::Scan, &workload, &ScanConfig::default())?;
//! let stats = session.run()?;
//! println!("{} ops, {:.0} bytes/s", stats.total_ops, stats.bytes_per_sec());
//! # Ok::<(), recbench::error::BenchError>(())
//! ```

use crate::config::{ScanConfig, WorkloadConfig};
use crate::error::BenchError;
use crate::plan::bounds::{Bound, BoundsResolver, ResolvedBounds, ScanShape};
use crate::stats::aggregator::StatsAggregator;
use crate::stats::SessionStats;
use crate::target::{detect_block_size, FileCatalog};
use crate::util::align::buffer_size;
use crate::worker::{Worker, WorkerSetup, Workload};
use crate::Result;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A validated benchmark run, ready to execute
#[derive(Debug)]
pub struct Session {
    setup: WorkerSetup,
    threads: usize,
}

impl Session {
    /// Build the catalog, detect the block size and resolve the bounds
    ///
    /// No data file is opened here; every validation error surfaces before
    /// the first read.
    pub fn new(workload: Workload, config: &WorkloadConfig, scan: &ScanConfig) -> Result<Self> {
        if config.threads == 0 {
            return Err(BenchError::invalid_config("threads must be at least 1"));
        }

        let catalog = FileCatalog::build(&config.dir, config.record_size)?;

        let block_size = match config.block_size {
            Some(size) if size >= 512 && size.is_power_of_two() => size,
            Some(size) => {
                return Err(BenchError::invalid_config(format!(
                    "block size {} is not a power of two of at least 512",
                    size
                )))
            }
            None => detect_block_size(&config.dir)?,
        };

        let resolver = BoundsResolver::new(catalog.len());
        let bounds = match workload {
            Workload::Scan => resolver.resolve(&scan.file_count, &scan.extent, scan.shape())?,
            Workload::Lookup => resolver.resolve(&Bound::all(), &Bound::all(), ScanShape::default())?,
        };

        let setup = WorkerSetup {
            catalog: Arc::new(catalog),
            bounds,
            workload,
            buffered: config.buffered,
            block_size,
            max_time: config.max_time(),
            seed: config.seed,
        };

        tracing::info!(
            workload = %workload,
            dir = %config.dir.display(),
            files = setup.catalog.len(),
            total_bytes = setup.catalog.total_bytes(),
            record_size = config.record_size,
            block_size,
            buffered = config.buffered,
            threads = config.threads,
            "session prepared"
        );

        Ok(Self {
            setup,
            threads: config.threads,
        })
    }

    pub fn workload(&self) -> Workload {
        self.setup.workload
    }

    pub fn catalog(&self) -> &FileCatalog {
        &self.setup.catalog
    }

    pub fn bounds(&self) -> &ResolvedBounds {
        &self.setup.bounds
    }

    pub fn block_size(&self) -> u64 {
        self.setup.block_size
    }

    pub fn record_size(&self) -> u64 {
        self.setup.record_size()
    }

    pub fn buffered(&self) -> bool {
        self.setup.buffered
    }

    pub fn max_time(&self) -> Duration {
        self.setup.max_time
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Alignment unit for extent offsets and lengths
    pub fn unit(&self) -> u64 {
        self.setup.unit()
    }

    /// Bytes each worker's I/O buffer holds
    pub fn io_buffer_size(&self) -> u64 {
        if self.setup.buffered {
            self.record_size()
        } else {
            buffer_size(self.record_size(), self.setup.block_size)
        }
    }

    /// Run every worker to completion and return the merged statistics
    ///
    /// If any worker fails, the failure of the lowest worker id is returned
    /// and no statistics are published. Workers stop only on their own
    /// budget, so a failure is reported once every sibling has run out its
    /// `max_time`.
    pub fn run(&self) -> Result<SessionStats> {
        let aggregator = Arc::new(StatsAggregator::new());

        tracing::info!(threads = self.threads, workload = %self.setup.workload, "session started");

        if self.threads == 1 {
            let result = Worker::new(0, &self.setup)?.run()?;
            aggregator.merge(&result)?;
        } else {
            let setup = Arc::new(self.setup.clone());
            let handles: Vec<_> = (0..self.threads)
                .map(|id| {
                    let setup = Arc::clone(&setup);
                    let aggregator = Arc::clone(&aggregator);
                    thread::Builder::new()
                        .name(format!("recbench-worker-{}", id))
                        .spawn(move || -> Result<()> {
                            let result = Worker::new(id, &setup)?.run()?;
                            aggregator.merge(&result)
                        })
                        .map_err(|e| BenchError::invalid_config(format!("failed to spawn worker {}: {}", id, e)))
                })
                .collect();

            // Join everything before reporting so no worker outlives the session
            let mut first_error = None;
            for (id, handle) in handles.into_iter().enumerate() {
                let outcome = match handle {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or(Err(BenchError::WorkerPanicked { worker: id })),
                    Err(e) => Err(e),
                };
                if let Err(e) = outcome {
                    tracing::debug!(worker = id, error = %e, "worker failed");
                    first_error.get_or_insert(e);
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        let stats = Arc::try_unwrap(aggregator)
            .map(StatsAggregator::into_stats)
            .unwrap_or_else(|shared| shared.snapshot());

        tracing::info!(
            ops = stats.total_ops,
            bytes = stats.total_bytes,
            elapsed_ns = stats.max_elapsed_ns,
            "session finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn dataset(files: usize, size: usize) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for i in 0..files {
            fs::write(tmp.path().join(format!("{:02}.bin", i)), vec![7u8; size]).unwrap();
        }
        tmp
    }

    fn workload(dir: &Path, threads: usize, max_time_ns: u64) -> WorkloadConfig {
        WorkloadConfig {
            dir: dir.to_path_buf(),
            record_size: 4096,
            max_time_ns,
            buffered: true,
            threads,
            block_size: Some(4096),
            seed: Some(11),
        }
    }

    #[test]
    fn test_single_thread_zero_budget() {
        let tmp = dataset(3, 16_384);
        let session = Session::new(
            Workload::Scan,
            &workload(tmp.path(), 1, 0),
            &ScanConfig::default(),
        )
        .unwrap();
        let stats = session.run().unwrap();
        assert_eq!(stats.workers, 1);
        assert_eq!(stats.total_ops, 1);
    }

    #[test]
    fn test_full_scan_single_file_reads_whole_files() {
        let tmp = dataset(1, 1 << 20);
        let scan = ScanConfig {
            extent: Bound::ratio(1.0, 1.0),
            ..Default::default()
        };
        let session = Session::new(
            Workload::Scan,
            &workload(tmp.path(), 1, 30_000_000),
            &scan,
        )
        .unwrap();
        let stats = session.run().unwrap();
        assert_eq!(stats.total_files, stats.total_ops);
        // Only the last iteration can be cut short by the budget
        assert!(stats.total_bytes >= (stats.total_ops - 1) << 20);
        assert!(stats.total_bytes <= stats.total_ops << 20);
        assert_eq!(stats.total_records, stats.total_bytes / 4096);
    }

    #[test]
    fn test_multi_thread_merges_every_worker() {
        let tmp = dataset(4, 32_768);
        let scan = ScanConfig {
            file_count: Bound::ratio(0.25, 0.75),
            extent: Bound::ratio(0.1, 0.5),
            sequential_scan_order: false,
            ..Default::default()
        };
        let session = Session::new(
            Workload::Scan,
            &workload(tmp.path(), 4, 20_000_000),
            &scan,
        )
        .unwrap();
        let stats = session.run().unwrap();
        assert_eq!(stats.workers, 4);
        assert!(stats.total_ops >= 4);
        assert_eq!(stats.latency.len(), stats.total_ops);
        assert!(stats.max_elapsed_ns >= 20_000_000);
    }

    #[test]
    fn test_lookup_session() {
        let tmp = dataset(2, 8192);
        let session = Session::new(
            Workload::Lookup,
            &workload(tmp.path(), 2, 5_000_000),
            &ScanConfig::default(),
        )
        .unwrap();
        let stats = session.run().unwrap();
        assert_eq!(stats.total_records, stats.total_ops);
        assert!(stats.total_bytes <= stats.total_ops * 4096);
        assert!(stats.total_bytes % 4096 == 0);
    }

    #[test]
    fn test_validation_before_io() {
        let tmp = dataset(2, 8192);

        let mut w = workload(tmp.path(), 0, 0);
        assert!(matches!(
            Session::new(Workload::Scan, &w, &ScanConfig::default()),
            Err(BenchError::InvalidConfig { .. })
        ));

        w.threads = 1;
        w.block_size = Some(1000);
        assert!(matches!(
            Session::new(Workload::Scan, &w, &ScanConfig::default()),
            Err(BenchError::InvalidConfig { .. })
        ));

        w.block_size = Some(4096);
        let scan = ScanConfig {
            file_count: Bound::Ratio { min: -1.0, max: 0.5 },
            ..Default::default()
        };
        assert!(matches!(
            Session::new(Workload::Scan, &w, &scan),
            Err(BenchError::InvalidBound { .. })
        ));

        w.dir = tmp.path().join("missing");
        assert!(matches!(
            Session::new(Workload::Scan, &w, &ScanConfig::default()),
            Err(BenchError::InvalidDirectory { .. })
        ));
    }

    #[test]
    fn test_io_failure_surfaces_from_worker() {
        let tmp = dataset(2, 8192);
        let session = Session::new(
            Workload::Scan,
            &workload(tmp.path(), 2, 0),
            &ScanConfig::default(),
        )
        .unwrap();
        fs::remove_file(tmp.path().join("00.bin")).unwrap();
        fs::remove_file(tmp.path().join("01.bin")).unwrap();
        assert!(matches!(session.run(), Err(BenchError::IoFailure { .. })));
    }

    #[test]
    fn test_accessors() {
        let tmp = dataset(2, 4096);
        let mut w = workload(tmp.path(), 1, 0);
        w.buffered = false;
        w.record_size = 1024;
        w.block_size = Some(512);

        let session = Session::new(Workload::Lookup, &w, &ScanConfig::default()).unwrap();
        assert_eq!(session.block_size(), 512);
        assert_eq!(session.unit(), 512);
        assert_eq!(session.io_buffer_size(), 1024);
        assert_eq!(session.threads(), 1);
        assert_eq!(session.workload(), Workload::Lookup);
        assert_eq!(session.catalog().len(), 2);
        assert!(!session.buffered());
    }
}
