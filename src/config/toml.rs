//! TOML configuration file parsing

use super::*;
use crate::config::cli::{ReadArgs, ScanArgs, WriteArgs};
use crate::config::cli_convert::{
    parse_extent_bound, parse_file_count_bound, parse_size, parse_time_ns,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Load the configuration file if one was given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => parse_toml_file(path),
        None => Ok(Config::default()),
    }
}

/// Merge read-workload CLI arguments into the configuration (CLI takes precedence)
pub fn merge_read_args(args: &ReadArgs, config: &mut WorkloadConfig) -> Result<()> {
    if let Some(ref dir) = args.dir {
        config.dir = dir.clone();
    }
    if let Some(ref size) = args.record_size {
        config.record_size = parse_size(size).context("Invalid --record-size")?;
    }
    if let Some(ref time) = args.max_time {
        config.max_time_ns = parse_time_ns(time).context("Invalid --max-time")?;
    }
    if let Some(buffered) = args.buffered {
        config.buffered = buffered;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(ref size) = args.block_size {
        config.block_size = Some(parse_size(size).context("Invalid --block-size")?);
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    Ok(())
}

/// Merge scan CLI arguments into the configuration (CLI takes precedence)
pub fn merge_scan_args(args: &ScanArgs, config: &mut Config) -> Result<()> {
    merge_read_args(&args.read, &mut config.workload)?;

    let scan = &mut config.scan;
    if let Some(ref s) = args.file_ratio {
        scan.file_count = parse_file_count_bound(s).context("Invalid --file-ratio")?;
    }
    if let Some(ref s) = args.size_ratio {
        scan.extent = parse_extent_bound(s).context("Invalid --size-ratio")?;
    }
    if let Some(v) = args.seq_file {
        scan.sequential_file_order = v;
    }
    if let Some(v) = args.seq_scan {
        scan.sequential_scan_order = v;
    }
    if let Some(v) = args.full_middle {
        scan.full_middle = v;
    }
    Ok(())
}

/// Merge writer CLI arguments into the configuration (CLI takes precedence)
pub fn merge_write_args(args: &WriteArgs, config: &mut WriteConfig) -> Result<()> {
    if let Some(ref dir) = args.dir {
        config.dir = dir.clone();
    }
    if let Some(ref size) = args.total_size {
        config.total_size = parse_size(size).context("Invalid --total-size")?;
    }
    if let Some(ref size) = args.file_size {
        config.file_size = parse_size(size).context("Invalid --file-size")?;
    }
    if let Some(sequential) = args.sequential {
        config.sequential = sequential;
    }
    Ok(())
}
