//! Access planning
//!
//! An `AccessPlanner` turns the session's resolved bounds into one concrete
//! `AccessPlan` per iteration: which files to touch, in what order, and which
//! extent of each to read. Each worker owns its own planner and random
//! source, so planning never contends across threads.
//!
//! # Extent rules
//!
//! - `offset + length <= file_size` always holds
//! - offsets are multiples of the alignment unit (record size when buffered,
//!   block size when unbuffered)
//! - lengths are multiples of the unit unless the extent runs to end of file
//!
//! # Example
//!
//! ```no_run
//! use recbench::distribution::uniform::UniformSource;
//! use recbench::plan::bounds::{Bound, BoundsResolver, ScanShape};
//! use recbench::plan::AccessPlanner;
//! use recbench::target::FileCatalog;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(FileCatalog::build(Path::new("/data/set"), 4096)?);
//! let bounds = BoundsResolver::new(catalog.len())
//!     .resolve(&Bound::ratio(0.2, 0.5), &Bound::ratio(0.1, 0.3), ScanShape::default())?;
//! let mut planner = AccessPlanner::new(catalog, bounds, 4096, UniformSource::new());
//! let plan = planner.plan_scan();
//! assert!(!plan.extents.is_empty());
//! # Ok::<(), recbench::error::BenchError>(())
//! ```

pub mod bounds;

use crate::distribution::RandomSource;
use crate::target::FileCatalog;
use crate::util::align::{align_down, ceil_in_range, round_in_range};
use bounds::{ExtentRange, ResolvedBounds};
use std::sync::Arc;

/// Byte range of one catalog file to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedExtent {
    pub file_index: usize,
    pub offset: u64,
    pub length: u64,
}

/// How the executor walks the files of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// One file at a time, each read to completion
    Sequential,
    /// All files open at once, reads spread across them in random bursts
    Interleaved,
}

/// Work for one iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPlan {
    pub extents: Vec<PlannedExtent>,
    pub order: ScanOrder,
}

impl AccessPlan {
    /// Total bytes the plan asks for
    pub fn total_length(&self) -> u64 {
        self.extents.iter().map(|e| e.length).sum()
    }
}

/// Per-worker planner
pub struct AccessPlanner<R: RandomSource> {
    catalog: Arc<FileCatalog>,
    bounds: ResolvedBounds,
    unit: u64,
    rng: R,
    // Permutation of catalog indices reused by the partial Fisher-Yates draw
    scratch: Vec<usize>,
}

impl<R: RandomSource> AccessPlanner<R> {
    /// `unit` is the alignment unit: record size when buffered, block size otherwise
    pub fn new(catalog: Arc<FileCatalog>, bounds: ResolvedBounds, unit: u64, rng: R) -> Self {
        let scratch = (0..catalog.len()).collect();
        Self {
            catalog,
            bounds,
            unit: unit.max(1),
            rng,
            scratch,
        }
    }

    pub fn catalog(&self) -> &FileCatalog {
        &self.catalog
    }

    pub fn catalog_arc(&self) -> &Arc<FileCatalog> {
        &self.catalog
    }

    pub fn unit(&self) -> u64 {
        self.unit
    }

    /// Random source, shared with the executor for interleaving draws
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Plan one scan iteration
    pub fn plan_scan(&mut self) -> AccessPlan {
        let n = self.catalog.len();
        if n == 1 {
            let extent = self.uniform_extent(0);
            return AccessPlan {
                extents: vec![extent],
                order: ScanOrder::Sequential,
            };
        }

        let files = self.bounds.files;
        let k = self
            .rng
            .next_range(files.min_files as u64, files.max_files as u64) as usize;
        let chosen = self.choose_files(k);

        let extents = if self.bounds.shape.full_middle && chosen.len() >= 2 {
            self.full_middle_extents(&chosen)
        } else {
            chosen.iter().map(|&i| self.uniform_extent(i)).collect()
        };

        let order = if self.bounds.shape.sequential_scan_order {
            ScanOrder::Sequential
        } else {
            ScanOrder::Interleaved
        };

        AccessPlan { extents, order }
    }

    /// Plan one point lookup: a random record of a random file
    pub fn plan_lookup(&mut self) -> AccessPlan {
        let n = self.catalog.len();
        let file_index = if n == 1 {
            0
        } else {
            self.rng.next_range(0, n as u64 - 1) as usize
        };

        let size = self.catalog.get(file_index).size;
        let record = self.catalog.record_size().min(size);
        let pos = round_in_range(self.rng.next_unit(), 0, size.saturating_sub(1)).min(size - record);
        let offset = align_down(pos, self.unit);

        AccessPlan {
            extents: vec![PlannedExtent {
                file_index,
                offset,
                length: record.min(size - offset),
            }],
            order: ScanOrder::Sequential,
        }
    }

    /// `k` distinct catalog indices, sorted when file order is sequential
    fn choose_files(&mut self, k: usize) -> Vec<usize> {
        let n = self.scratch.len();
        let k = k.clamp(1, n);
        for i in 0..k {
            let j = self.rng.next_range(i as u64, n as u64 - 1) as usize;
            self.scratch.swap(i, j);
        }

        let mut chosen = self.scratch[..k].to_vec();
        if self.bounds.shape.sequential_file_order {
            chosen.sort_unstable();
        }
        chosen
    }

    /// Draw an extent length for a file of `size` bytes
    ///
    /// Returns `size` when the whole file should be read.
    fn draw_length(&mut self, size: u64) -> u64 {
        let unit = self.unit;
        if self.bounds.extent.full_scan || size <= unit {
            return size;
        }

        let len = match self.bounds.extent.range {
            ExtentRange::Ratio { min, max } => {
                let ratio = self.rng.next_between(min, max);
                if ratio >= 1.0 {
                    return size;
                }
                align_down(ceil_in_range(ratio, unit, size), unit)
            }
            ExtentRange::Size { min, max } => align_down(self.rng.next_range(min, max), unit).max(unit),
        };

        len.min(size)
    }

    /// Extent of uniform length at a uniform position
    fn uniform_extent(&mut self, file_index: usize) -> PlannedExtent {
        let size = self.catalog.get(file_index).size;
        let length = self.draw_length(size);
        if length >= size {
            return PlannedExtent {
                file_index,
                offset: 0,
                length: size,
            };
        }

        let slots = (size - length) / self.unit;
        let offset = self.rng.next_range(0, slots) * self.unit;
        PlannedExtent {
            file_index,
            offset,
            length,
        }
    }

    /// Tail of the first file, every interior file in full, head of the last
    fn full_middle_extents(&mut self, chosen: &[usize]) -> Vec<PlannedExtent> {
        let last = chosen.len() - 1;
        let mut extents = Vec::with_capacity(chosen.len());

        for (pos, &file_index) in chosen.iter().enumerate() {
            let size = self.catalog.get(file_index).size;
            let extent = if pos == 0 {
                let length = self.draw_length(size);
                let offset = align_down(size - length, self.unit);
                PlannedExtent {
                    file_index,
                    offset,
                    length: size - offset,
                }
            } else if pos == last {
                PlannedExtent {
                    file_index,
                    offset: 0,
                    length: self.draw_length(size),
                }
            } else {
                PlannedExtent {
                    file_index,
                    offset: 0,
                    length: size,
                }
            };
            extents.push(extent);
        }

        extents
    }
}
