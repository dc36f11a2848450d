//! Workload configuration types
//!
//! `WorkloadConfig` carries the settings every read workload shares,
//! `ScanConfig` the scan-only shaping, and `WriteConfig` the dataset writer's
//! inputs. Sizes and times may be written in TOML either as integers (bytes,
//! nanoseconds) or as strings with units (`"4k"`, `"10s"`).

use crate::config::cli_convert::{parse_size, parse_time_ns};
use crate::plan::bounds::{Bound, ScanShape};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by the lookup and scan workloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Directory holding the `.bin` data files
    #[serde(default)]
    pub dir: PathBuf,
    /// Record size in bytes
    #[serde(default = "default_record_size", deserialize_with = "de_size")]
    pub record_size: u64,
    /// Per-worker time budget in nanoseconds
    #[serde(default = "default_max_time_ns", deserialize_with = "de_time_ns")]
    pub max_time_ns: u64,
    /// Go through the page cache
    #[serde(default = "default_true")]
    pub buffered: bool,
    /// Worker threads
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Override of the detected filesystem block size
    #[serde(default, deserialize_with = "de_opt_size")]
    pub block_size: Option<u64>,
    /// Base seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl WorkloadConfig {
    pub fn max_time(&self) -> Duration {
        Duration::from_nanos(self.max_time_ns)
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::new(),
            record_size: default_record_size(),
            max_time_ns: default_max_time_ns(),
            buffered: true,
            threads: default_threads(),
            block_size: None,
            seed: None,
        }
    }
}

/// Scan shaping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Files per iteration; `{0, 0}` means every file
    #[serde(default)]
    pub file_count: Bound,
    /// Bytes read from each file; `{0, 0}` means the whole file
    #[serde(default)]
    pub extent: Bound,
    #[serde(default = "default_true")]
    pub sequential_file_order: bool,
    #[serde(default = "default_true")]
    pub sequential_scan_order: bool,
    #[serde(default)]
    pub full_middle: bool,
}

impl ScanConfig {
    pub fn shape(&self) -> ScanShape {
        ScanShape {
            sequential_file_order: self.sequential_file_order,
            sequential_scan_order: self.sequential_scan_order,
            full_middle: self.full_middle,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        let shape = ScanShape::default();
        Self {
            file_count: Bound::all(),
            extent: Bound::all(),
            sequential_file_order: shape.sequential_file_order,
            sequential_scan_order: shape.sequential_scan_order,
            full_middle: shape.full_middle,
        }
    }
}

/// Dataset writer inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConfig {
    #[serde(default)]
    pub dir: PathBuf,
    /// Total bytes across all files
    #[serde(default, deserialize_with = "de_size")]
    pub total_size: u64,
    /// Bytes per file; 0 writes a single file
    #[serde(default, deserialize_with = "de_size")]
    pub file_size: u64,
    /// Write files in name order instead of shuffled
    #[serde(default = "default_true")]
    pub sequential: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::new(),
            total_size: 0,
            file_size: 0,
            sequential: true,
        }
    }
}

fn default_record_size() -> u64 {
    4096
}

fn default_max_time_ns() -> u64 {
    10_000_000_000
}

fn default_threads() -> usize {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

fn de_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}

fn de_opt_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    de_size(deserializer).map(Some)
}

fn de_time_ns<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => parse_time_ns(&s).map_err(serde::de::Error::custom),
    }
}
