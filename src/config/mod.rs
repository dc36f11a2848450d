//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//! A TOML file has up to three tables:
//!
//! ```toml
//! [workload]
//! dir = "/data/set"
//! record_size = "4k"
//! max_time_ns = "30s"
//! buffered = false
//! threads = 8
//!
//! [scan]
//! file_count = { kind = "ratio", min = 0.2, max = 0.5 }
//! extent = { kind = "ratio", min = 0.1, max = 0.3 }
//! sequential_scan_order = false
//!
//! [write]
//! dir = "/data/set"
//! total_size = "16G"
//! file_size = "1G"
//! ```
//!
//! Values given explicitly on the command line override the file.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;
pub mod workload;

pub use workload::{ScanConfig, WorkloadConfig, WriteConfig};

use serde::{Deserialize, Serialize};

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub write: WriteConfig,
}
