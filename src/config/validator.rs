//! Configuration validation
//!
//! Hard errors stop the run before any file is touched. Questionable but
//! legal settings are reported through `tracing::warn!` and the run goes on.

use super::*;
use crate::plan::bounds::Bound;
use anyhow::Result;

/// Smallest block size accepted as an override
pub const MIN_BLOCK_SIZE: u64 = 512;

/// Validate the settings shared by the read workloads
pub fn validate_workload(workload: &WorkloadConfig) -> Result<()> {
    if workload.dir.as_os_str().is_empty() {
        anyhow::bail!("workload.dir must be set (--dir or [workload] dir)");
    }
    if workload.record_size == 0 {
        anyhow::bail!("record_size must be greater than 0");
    }
    if workload.threads == 0 {
        anyhow::bail!("threads must be at least 1");
    }
    if let Some(block_size) = workload.block_size {
        validate_block_size(block_size)?;
    }

    for warning in workload_warnings(workload, num_cpus::get()) {
        tracing::warn!("{}", warning);
    }

    Ok(())
}

/// Reject block sizes the kernel would not accept for direct I/O
pub fn validate_block_size(block_size: u64) -> Result<()> {
    if block_size < MIN_BLOCK_SIZE || !block_size.is_power_of_two() {
        anyhow::bail!(
            "block_size must be a power of two of at least {}, got {}",
            MIN_BLOCK_SIZE,
            block_size
        );
    }
    Ok(())
}

/// Legal settings that are likely to distort results
pub fn workload_warnings(workload: &WorkloadConfig, cpu_count: usize) -> Vec<String> {
    let mut warnings = Vec::new();

    if workload.threads > cpu_count {
        warnings.push(format!(
            "{} threads exceed the {} available CPUs; workers will time-share",
            workload.threads, cpu_count
        ));
    }

    if let Some(block_size) = workload.block_size {
        if let Some(warning) = unaligned_record_warning(workload.buffered, workload.record_size, block_size) {
            warnings.push(warning);
        }
    }

    warnings
}

/// Warn when unbuffered reads of whole records cannot be block-aligned
pub fn unaligned_record_warning(buffered: bool, record_size: u64, block_size: u64) -> Option<String> {
    if buffered || block_size == 0 || record_size % block_size == 0 {
        return None;
    }
    Some(format!(
        "record size {} is not a multiple of the block size {}; unbuffered reads will \
         transfer whole blocks and offsets snap to block boundaries",
        record_size, block_size
    ))
}

/// Scan ratios that will be clamped
///
/// Negative and NaN ratios are rejected when the session resolves its
/// bounds; only the legal-but-clamped case is reported here.
pub fn scan_warnings(scan: &ScanConfig) -> Vec<String> {
    [("file_count", &scan.file_count), ("extent", &scan.extent)]
        .into_iter()
        .filter_map(|(name, bound)| match bound {
            Bound::Ratio { max, .. } if *max > 1.0 => {
                Some(format!("{} ratio {} is above 1 and will be clamped", name, max))
            }
            _ => None,
        })
        .collect()
}

/// Validate the dataset writer inputs
pub fn validate_write(write: &WriteConfig) -> Result<()> {
    if write.dir.as_os_str().is_empty() {
        anyhow::bail!("write.dir must be set (--dir or [write] dir)");
    }
    if write.total_size == 0 {
        anyhow::bail!("total_size must be greater than 0");
    }
    Ok(())
}
