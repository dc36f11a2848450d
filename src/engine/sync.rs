//! Sequential plan execution
//!
//! Files are visited in plan order; each is opened, positioned and read to
//! the end of its extent before the next one is opened, so at most one file
//! is open at a time.

use super::{ExecOutcome, IoExecutor};
use crate::plan::AccessPlan;
use crate::target::{DataFileReader, FileCatalog};
use crate::util::time::Budget;
use crate::Result;

impl IoExecutor {
    pub(crate) fn run_sequential(
        &mut self,
        catalog: &FileCatalog,
        plan: &AccessPlan,
        budget: &mut Budget,
    ) -> Result<ExecOutcome> {
        let mut outcome = ExecOutcome::default();

        for extent in &plan.extents {
            let file = catalog.get(extent.file_index);
            let mut reader = DataFileReader::open(&file.path, self.is_buffered())?;
            outcome.files_opened += 1;
            outcome.peak_open = 1;
            if budget.exceeded() {
                outcome.budget_exceeded = true;
                return Ok(outcome);
            }

            if extent.offset > 0 {
                reader.seek(extent.offset)?;
                if budget.exceeded() {
                    outcome.budget_exceeded = true;
                    return Ok(outcome);
                }
            }

            let mut remaining = extent.length;
            while remaining > 0 {
                let step = self.read_step(&mut reader, remaining)?;
                remaining -= step.counted;
                outcome.bytes += step.counted;

                if budget.exceeded() {
                    outcome.budget_exceeded = true;
                    return Ok(outcome);
                }
                if step.eof {
                    break;
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::catalog_with_sizes;
    use super::*;
    use crate::plan::{PlannedExtent, ScanOrder};
    use std::time::Duration;

    fn plan(extents: Vec<PlannedExtent>) -> AccessPlan {
        AccessPlan {
            extents,
            order: ScanOrder::Sequential,
        }
    }

    #[test]
    fn test_reads_whole_extents() {
        let (_tmp, catalog) = catalog_with_sizes(&[40_960, 8192, 12_288], 4096);
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        let p = plan(vec![
            PlannedExtent { file_index: 0, offset: 8192, length: 16_384 },
            PlannedExtent { file_index: 1, offset: 0, length: 8192 },
            PlannedExtent { file_index: 2, offset: 4096, length: 8192 },
        ]);

        let out = exec.run_sequential(&catalog, &p, &mut Budget::unlimited()).unwrap();
        assert_eq!(out.bytes, 16_384 + 8192 + 8192);
        assert_eq!(out.files_opened, 3);
        assert_eq!(out.peak_open, 1);
        assert!(!out.budget_exceeded);
    }

    #[test]
    fn test_extent_past_eof_stops_at_eof() {
        let (_tmp, catalog) = catalog_with_sizes(&[8192], 4096);
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        // A plan that asks for more than the file holds
        let p = plan(vec![PlannedExtent { file_index: 0, offset: 4096, length: 16_384 }]);

        let out = exec.run_sequential(&catalog, &p, &mut Budget::unlimited()).unwrap();
        assert_eq!(out.bytes, 4096);
    }

    #[test]
    fn test_partial_record_tail_counts_only_planned_bytes() {
        // Record size 100: buffer is 100 bytes, reads stop exactly at the extent end
        let (_tmp, catalog) = catalog_with_sizes(&[1000], 100);
        let mut exec = IoExecutor::new(true, 100, 4096).unwrap();
        let p = plan(vec![PlannedExtent { file_index: 0, offset: 300, length: 500 }]);

        let out = exec.run_sequential(&catalog, &p, &mut Budget::unlimited()).unwrap();
        assert_eq!(out.bytes, 500);
    }

    #[test]
    fn test_zero_budget_stops_after_first_open() {
        let (_tmp, catalog) = catalog_with_sizes(&[8192, 8192], 4096);
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        let p = plan(vec![
            PlannedExtent { file_index: 0, offset: 0, length: 8192 },
            PlannedExtent { file_index: 1, offset: 0, length: 8192 },
        ]);

        let mut budget = Budget::start(Duration::ZERO);
        let out = exec.run_sequential(&catalog, &p, &mut budget).unwrap();
        assert!(out.budget_exceeded);
        assert_eq!(out.files_opened, 1);
        assert_eq!(out.bytes, 0);
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let (tmp, catalog) = catalog_with_sizes(&[4096, 4096], 4096);
        std::fs::remove_file(tmp.path().join("01.bin")).unwrap();
        let mut exec = IoExecutor::new(true, 4096, 4096).unwrap();
        let p = plan(vec![
            PlannedExtent { file_index: 0, offset: 0, length: 4096 },
            PlannedExtent { file_index: 1, offset: 0, length: 4096 },
        ]);

        let err = exec.run_sequential(&catalog, &p, &mut Budget::unlimited()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::BenchError::IoFailure { op: crate::error::IoOp::Open, .. }
        ));
    }
}
