//! JSON output formatting
//!
//! A `SessionReport` captures one run: when it finished, what was asked for,
//! the merged counters, derived rates and the latency summary. It is written
//! with `serde_json` to the path given by `--json-output`.

use crate::output::Argument;
use crate::stats::{LatencySummary, SessionStats};
use crate::util::time::format_throughput;
use crate::worker::Workload;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Merged counters
#[derive(Debug, Clone, Serialize)]
pub struct JsonTotals {
    pub workers: usize,
    pub operations: u64,
    pub bytes: u64,
    pub records: u64,
    pub files: u64,
    pub elapsed_ns: u64,
}

/// Rates over the slowest worker's elapsed time
#[derive(Debug, Clone, Serialize)]
pub struct JsonThroughput {
    pub bytes_per_sec: f64,
    pub records_per_sec: f64,
    pub ops_per_sec: f64,
    pub human: String,
}

/// Complete report of one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub version: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub workload: Workload,
    pub arguments: BTreeMap<String, String>,
    pub totals: JsonTotals,
    pub throughput: JsonThroughput,
    pub latency: LatencySummary,
}

impl SessionReport {
    pub fn new(workload: Workload, args: &[Argument], stats: &SessionStats) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            workload,
            arguments: args.iter().cloned().collect(),
            totals: JsonTotals {
                workers: stats.workers,
                operations: stats.total_ops,
                bytes: stats.total_bytes,
                records: stats.total_records,
                files: stats.total_files,
                elapsed_ns: stats.max_elapsed_ns,
            },
            throughput: JsonThroughput {
                bytes_per_sec: stats.bytes_per_sec(),
                records_per_sec: stats.records_per_sec(),
                ops_per_sec: stats.ops_per_sec(),
                human: format_throughput(stats.bytes_per_sec()),
            },
            latency: stats.latency_summary(),
        }
    }
}

/// Write a report to `output_path`
pub fn write_json_output(output_path: &Path, report: &SessionReport, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writer.flush()?;

    Ok(())
}
