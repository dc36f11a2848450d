//! I/O execution
//!
//! The `IoExecutor` carries out one `AccessPlan`: it opens each referenced
//! file, seeks to the planned offset, and reads the planned length in
//! buffer-sized chunks. Two walk orders are supported:
//!
//! - **Sequential** (`sync`): one file at a time, each read to completion
//! - **Interleaved** (`interleaved`): every file open at once, reads spread
//!   across them in random bursts
//!
//! The session budget is polled after every open, seek and read. Once it is
//! exceeded no further I/O is issued; open files are closed as their readers
//! drop, which also covers the error paths.
//!
//! # Read sizing
//!
//! Each read asks for `min(buffer_size, align_up(remaining, unit))` bytes so
//! that unbuffered transfers stay block-aligned, and counts at most
//! `remaining` bytes toward the plan. A read that returns fewer bytes than
//! requested means end of file and retires that file.

pub mod interleaved;
pub mod sync;

use crate::distribution::RandomSource;
use crate::plan::{AccessPlan, ScanOrder};
use crate::target::{DataFileReader, FileCatalog};
use crate::util::align::{align_up, buffer_size};
use crate::util::buffer::AlignedBuffer;
use crate::util::time::Budget;
use crate::Result;

/// What executing one plan achieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Bytes counted toward the plan
    pub bytes: u64,
    pub files_opened: u64,
    /// Most files held open at the same time
    pub peak_open: usize,
    /// The budget ran out during this plan
    pub budget_exceeded: bool,
}

/// Result of one read step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReadStep {
    /// Bytes counted toward the extent
    pub counted: u64,
    /// The file has nothing more to give
    pub eof: bool,
}

/// Per-worker executor owning the worker's I/O buffer
pub struct IoExecutor {
    buffer: AlignedBuffer,
    buffered: bool,
    unit: u64,
}

impl IoExecutor {
    /// Build an executor for the given I/O mode
    ///
    /// Buffered mode reads one record per call; unbuffered mode reads the
    /// smallest block multiple that holds a record.
    pub fn new(buffered: bool, record_size: u64, block_size: u64) -> Result<Self> {
        let (size, unit) = if buffered {
            (record_size, record_size)
        } else {
            (buffer_size(record_size, block_size), block_size)
        };
        let buffer = AlignedBuffer::new(size as usize, block_size as usize)?;

        Ok(Self {
            buffer,
            buffered,
            unit,
        })
    }

    pub fn buffer_size(&self) -> u64 {
        self.buffer.size() as u64
    }

    pub fn is_buffered(&self) -> bool {
        self.buffered
    }

    /// Execute `plan` against `catalog`
    ///
    /// `rng` drives the interleaving; it is not touched for sequential plans.
    pub fn execute<R: RandomSource>(
        &mut self,
        catalog: &FileCatalog,
        plan: &AccessPlan,
        rng: &mut R,
        budget: &mut Budget,
    ) -> Result<ExecOutcome> {
        match plan.order {
            ScanOrder::Sequential => self.run_sequential(catalog, plan, budget),
            ScanOrder::Interleaved => self.run_interleaved(catalog, plan, rng, budget),
        }
    }

    #[inline]
    fn request_len(&self, remaining: u64) -> usize {
        self.buffer_size().min(align_up(remaining, self.unit)) as usize
    }

    /// Issue one read against an extent with `remaining` planned bytes
    pub(crate) fn read_step(&mut self, reader: &mut DataFileReader, remaining: u64) -> Result<ReadStep> {
        let want = self.request_len(remaining);
        let n = reader.read(&mut self.buffer.as_mut_slice()[..want])? as u64;
        let counted = n.min(remaining);
        Ok(ReadStep {
            counted,
            eof: n < want as u64,
        })
    }

    /// Number of read calls needed for `remaining` bytes
    #[inline]
    pub(crate) fn reads_for(&self, remaining: u64) -> u64 {
        remaining.div_ceil(self.buffer_size())
    }
}
