//! Human-readable text output

use crate::output::Argument;
use crate::stats::SessionStats;
use crate::target::WrittenFile;
use crate::util::time::{format_duration, format_rate, format_throughput};
use std::fmt::Write;
use std::time::Duration;

/// `# key = value` lines, one per argument
pub fn render_arguments(args: &[Argument]) -> String {
    let width = args.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in args {
        let _ = writeln!(out, "# {:>width$} = {}", key, value, width = width);
    }
    out
}

/// Final counters, throughput and latency
pub fn render_results(stats: &SessionStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "operations: {}", format_number(stats.total_ops));
    let _ = writeln!(out, "total time: {} ns", format_number(stats.max_elapsed_ns));
    let _ = writeln!(out, "total size: {} bytes", format_number(stats.total_bytes));
    let _ = writeln!(out, "total records: {}", format_number(stats.total_records));
    let _ = writeln!(out, "total files: {}", format_number(stats.total_files));
    let _ = writeln!(
        out,
        "throughput: {:.0} bytes/sec, {:.0} records/sec ({}, {} ops/sec)",
        stats.bytes_per_sec(),
        stats.records_per_sec(),
        format_throughput(stats.bytes_per_sec()),
        format_rate(stats.ops_per_sec()),
    );

    let summary = stats.latency_summary();
    if summary.samples == 0 {
        let _ = writeln!(out, "latency: no samples");
        return out;
    }

    let fmt = |ns: Option<u64>| {
        ns.map(|ns| format_duration(Duration::from_nanos(ns)))
            .unwrap_or_else(|| "-".to_string())
    };
    let _ = writeln!(
        out,
        "latency: min {}, mean {}, max {}",
        fmt(summary.min_ns),
        fmt(summary.mean_ns),
        fmt(summary.max_ns)
    );
    let _ = writeln!(
        out,
        "latency percentiles: p50 {}, p90 {}, p99 {}, p99.9 {}",
        fmt(summary.p50_ns),
        fmt(summary.p90_ns),
        fmt(summary.p99_ns),
        fmt(summary.p999_ns)
    );
    out
}

/// One line per written file plus the total
pub fn render_written(files: &[WrittenFile]) -> String {
    let mut out = String::new();
    let mut total_bytes = 0u64;
    let mut total_ns = 0u64;
    for file in files {
        let _ = writeln!(
            out,
            "{}: {} bytes in {} ns",
            file.name,
            format_number(file.size),
            format_number(file.elapsed_ns)
        );
        total_bytes += file.size;
        total_ns += file.elapsed_ns;
    }
    let rate = crate::util::time::per_second(total_bytes, total_ns);
    let _ = writeln!(
        out,
        "total: {} files, {} bytes in {} ns ({})",
        files.len(),
        format_number(total_bytes),
        format_number(total_ns),
        format_throughput(rate)
    );
    out
}

/// Print the argument echo followed by the results
pub fn print_report(args: &[Argument], stats: &SessionStats) {
    print!("{}", render_arguments(args));
    print!("{}", render_results(stats));
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
