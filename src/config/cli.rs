//! CLI argument parsing using clap

use crate::config::cli_convert::parse_bool;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// recbench - Storage microbenchmark for fixed-record data files
#[derive(Parser, Debug)]
#[command(name = "recbench")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML configuration file; explicit flags override its values
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(long, global = true)]
    pub json_output: Option<PathBuf>,

    /// Log at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Validate and print the effective configuration without running
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read one record at a time from random positions of random files
    Lookup(ReadArgs),

    /// Read bounded extents from random subsets of files
    Scan(ScanArgs),

    /// Populate a directory with random-content data files
    Write(WriteArgs),
}

/// Flags shared by the read workloads
#[derive(Args, Debug, Default, Clone)]
pub struct ReadArgs {
    /// Directory holding the .bin data files
    #[arg(short = 'd', long, env = "RECBENCH_DIR")]
    pub dir: Option<PathBuf>,

    /// Record size (e.g., 4096, 34b, 4k, 2MB)
    #[arg(short = 'r', long)]
    pub record_size: Option<String>,

    /// Time budget per worker (e.g., 300, 10s, 5min, 2h, 250ms, 10us, 500ns; bare numbers are ns)
    #[arg(short = 'm', long)]
    pub max_time: Option<String>,

    /// Read through the page cache {true, t, yes, y, 1, false, f, no, n, 0}
    #[arg(long, value_parser = bool_arg)]
    pub buffered: Option<bool>,

    /// Number of worker threads
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Override the detected filesystem block size (e.g., 4k)
    #[arg(long)]
    pub block_size: Option<String>,

    /// Base seed for reproducible access patterns
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub read: ReadArgs,

    /// Files per iteration "m,n": integers are counts, decimals are ratios
    #[arg(long)]
    pub file_ratio: Option<String>,

    /// Extent of each file "m,n": plain numbers are ratios, sized values (4k) are bytes
    #[arg(long)]
    pub size_ratio: Option<String>,

    /// Visit chosen files in name order
    #[arg(long, value_parser = bool_arg)]
    pub seq_file: Option<bool>,

    /// Read each file to completion before opening the next
    #[arg(long, value_parser = bool_arg)]
    pub seq_scan: Option<bool>,

    /// Tail of the first file, all interior files, head of the last
    #[arg(long, value_parser = bool_arg)]
    pub full_middle: Option<bool>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct WriteArgs {
    /// Output directory (created if missing)
    #[arg(short = 'd', long, env = "RECBENCH_DIR")]
    pub dir: Option<PathBuf>,

    /// Total bytes to write (e.g., 16G)
    #[arg(long)]
    pub total_size: Option<String>,

    /// Bytes per file (e.g., 1G); 0 writes a single file
    #[arg(long)]
    pub file_size: Option<String>,

    /// Write files in name order instead of shuffled
    #[arg(long, value_parser = bool_arg)]
    pub sequential: Option<bool>,
}

fn bool_arg(s: &str) -> Result<bool, String> {
    parse_bool(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_args() {
        let cli = Cli::try_parse_from([
            "recbench",
            "scan",
            "--dir",
            "/data",
            "--record-size",
            "4k",
            "--max-time",
            "10s",
            "--buffered",
            "no",
            "--threads",
            "4",
            "--file-ratio",
            "0.2,0.5",
            "--size-ratio",
            "0.1,0.3",
            "--seq-scan",
            "f",
        ])
        .unwrap();

        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.read.dir, Some(PathBuf::from("/data")));
                assert_eq!(args.read.record_size.as_deref(), Some("4k"));
                assert_eq!(args.read.buffered, Some(false));
                assert_eq!(args.read.threads, Some(4));
                assert_eq!(args.file_ratio.as_deref(), Some("0.2,0.5"));
                assert_eq!(args.seq_scan, Some(false));
                assert_eq!(args.seq_file, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "recbench",
            "lookup",
            "--dir",
            "/data",
            "--json-output",
            "out.json",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.json_output, Some(PathBuf::from("out.json")));
        assert!(matches!(cli.command, Command::Lookup(_)));
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let result = Cli::try_parse_from(["recbench", "lookup", "--buffered", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
