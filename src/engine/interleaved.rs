//! Interleaved plan execution
//!
//! Every file of the plan is opened and positioned up front. Reads are then
//! issued in bursts: a random active file is picked, a random number of
//! buffer-sized reads (at least one, at most what the file still needs) is
//! issued against it, and the file is retired once its extent is consumed or
//! it hits end of file.

use super::{ExecOutcome, IoExecutor};
use crate::distribution::RandomSource;
use crate::plan::AccessPlan;
use crate::target::{DataFileReader, FileCatalog};
use crate::util::time::Budget;
use crate::Result;

struct ActiveFile {
    reader: DataFileReader,
    remaining: u64,
}

impl IoExecutor {
    pub(crate) fn run_interleaved<R: RandomSource>(
        &mut self,
        catalog: &FileCatalog,
        plan: &AccessPlan,
        rng: &mut R,
        budget: &mut Budget,
    ) -> Result<ExecOutcome> {
        let mut outcome = ExecOutcome::default();
        let mut active: Vec<ActiveFile> = Vec::with_capacity(plan.extents.len());

        for extent in &plan.extents {
            let file = catalog.get(extent.file_index);
            let reader = DataFileReader::open(&file.path, self.is_buffered())?;
            outcome.files_opened += 1;
            active.push(ActiveFile {
                reader,
                remaining: extent.length,
            });
            outcome.peak_open = outcome.peak_open.max(active.len());

            if budget.exceeded() {
                outcome.budget_exceeded = true;
                return Ok(outcome);
            }
        }

        for (slot, extent) in active.iter_mut().zip(&plan.extents) {
            if extent.offset > 0 {
                slot.reader.seek(extent.offset)?;
                if budget.exceeded() {
                    outcome.budget_exceeded = true;
                    return Ok(outcome);
                }
            }
        }
        active.retain(|f| f.remaining > 0);

        while !active.is_empty() {
            let idx = rng.next_range(0, active.len() as u64 - 1) as usize;
            let burst = rng.next_range(1, self.reads_for(active[idx].remaining).max(1));

            let mut retire = false;
            for _ in 0..burst {
                let step = {
                    let slot = &mut active[idx];
                    let step = self.read_step(&mut slot.reader, slot.remaining)?;
                    slot.remaining -= step.counted;
                    step
                };
                outcome.bytes += step.counted;

                if budget.exceeded() {
                    outcome.budget_exceeded = true;
                    return Ok(outcome);
                }
                if step.eof || active[idx].remaining == 0 {
                    retire = true;
                    break;
                }
            }

            if retire {
                active.swap_remove(idx);
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::catalog_with_sizes;
    use super::*;
    use crate::distribution::uniform::UniformSource;
    use crate::plan::{PlannedExtent, ScanOrder};
    use std::time::Duration;

    fn plan(extents: Vec<PlannedExtent>) -> AccessPlan {
        AccessPlan {
            extents,
            order: ScanOrder::Interleaved,
        }
    }

    #[test]
    fn test_all_files_open_and_fully_consumed() {
        let (_tmp, catalog) = catalog_with_sizes(&[65_536, 32_768, 16_384], 4096);
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        let p = plan(vec![
            PlannedExtent { file_index: 0, offset: 4096, length: 40_960 },
            PlannedExtent { file_index: 1, offset: 0, length: 32_768 },
            PlannedExtent { file_index: 2, offset: 8192, length: 8192 },
        ]);

        for seed in 0..16 {
            let mut rng = UniformSource::with_seed(seed);
            let out = exec
                .run_interleaved(&catalog, &p, &mut rng, &mut Budget::unlimited())
                .unwrap();
            assert_eq!(out.peak_open, 3);
            assert_eq!(out.files_opened, 3);
            assert_eq!(out.bytes, p.total_length());
            assert!(!out.budget_exceeded);
        }
    }

    #[test]
    fn test_short_file_retired_at_eof() {
        let (_tmp, catalog) = catalog_with_sizes(&[8192, 8192], 4096);
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        let p = plan(vec![
            PlannedExtent { file_index: 0, offset: 4096, length: 65_536 },
            PlannedExtent { file_index: 1, offset: 0, length: 8192 },
        ]);

        let mut rng = UniformSource::with_seed(3);
        let out = exec
            .run_interleaved(&catalog, &p, &mut rng, &mut Budget::unlimited())
            .unwrap();
        assert_eq!(out.bytes, 4096 + 8192);
    }

    #[test]
    fn test_zero_budget_stops_during_open_phase() {
        let (_tmp, catalog) = catalog_with_sizes(&[8192, 8192, 8192], 4096);
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        let p = plan(vec![
            PlannedExtent { file_index: 0, offset: 0, length: 8192 },
            PlannedExtent { file_index: 1, offset: 0, length: 8192 },
            PlannedExtent { file_index: 2, offset: 0, length: 8192 },
        ]);

        let mut rng = UniformSource::with_seed(1);
        let mut budget = Budget::start(Duration::ZERO);
        let out = exec.run_interleaved(&catalog, &p, &mut rng, &mut budget).unwrap();
        assert!(out.budget_exceeded);
        assert_eq!(out.files_opened, 1);
        assert_eq!(out.bytes, 0);
    }

    #[test]
    fn test_empty_extent_opens_but_reads_nothing() {
        let (_tmp, catalog) = catalog_with_sizes(&[4096, 4096], 4096);
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        let p = plan(vec![
            PlannedExtent { file_index: 0, offset: 4096, length: 0 },
            PlannedExtent { file_index: 1, offset: 0, length: 4096 },
        ]);

        let mut rng = UniformSource::with_seed(9);
        let out = exec
            .run_interleaved(&catalog, &p, &mut rng, &mut Budget::unlimited())
            .unwrap();
        assert_eq!(out.files_opened, 2);
        assert_eq!(out.bytes, 4096);
    }
}
