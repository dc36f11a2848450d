//! String-to-value conversion for CLI arguments and TOML fields

use crate::plan::bounds::Bound;
use anyhow::{Context, Result};

/// Parse a size string (e.g., "4096", "34b", "4k", "2MB", "1G") to bytes
///
/// Units are binary: `k` is 1024 bytes. A trailing `b` is optional.
pub fn parse_size(s: &str) -> Result<u64> {
    let lower = s.trim().to_lowercase();
    let body = lower.strip_suffix('b').unwrap_or(&lower);

    let (num_str, multiplier) = match body.chars().last() {
        Some('k') => (&body[..body.len() - 1], 1024u64),
        Some('m') => (&body[..body.len() - 1], 1024 * 1024),
        Some('g') => (&body[..body.len() - 1], 1024 * 1024 * 1024),
        Some('t') => (&body[..body.len() - 1], 1024 * 1024 * 1024 * 1024),
        _ => (body, 1),
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Whether `s` carries a size unit (`b`, `k`, `m`, `g`, `t`, optionally followed by `b`)
pub fn has_size_unit(s: &str) -> bool {
    s.trim()
        .chars()
        .last()
        .map(|c| matches!(c.to_ascii_lowercase(), 'b' | 'k' | 'm' | 'g' | 't'))
        .unwrap_or(false)
}

/// Parse a time string (e.g., "300", "10s", "5min", "2h", "250ms", "10us", "500ns")
/// to nanoseconds
///
/// A bare number is nanoseconds. Negative values clamp to zero.
pub fn parse_time_ns(s: &str) -> Result<u64> {
    let lower = s.trim().to_lowercase();

    // Longer suffixes first so "ms" is not taken for "s"
    const UNITS: &[(&str, u64)] = &[
        ("min", 60_000_000_000),
        ("ms", 1_000_000),
        ("us", 1_000),
        ("ns", 1),
        ("h", 3_600_000_000_000),
        ("s", 1_000_000_000),
    ];

    let (num_str, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, mult)| lower.strip_suffix(suffix).map(|n| (n, *mult)))
        .unwrap_or((lower.as_str(), 1));

    let num: i64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid time format: {}", s))?;

    (num.max(0) as u64)
        .checked_mul(multiplier)
        .with_context(|| format!("Time out of range: {}", s))
}

/// Parse a boolean in any of the accepted spellings
///
/// `true, t, yes, y, 1` and `false, f, no, n, 0`, case-insensitive.
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        _ => anyhow::bail!(
            "Invalid boolean '{}'. Valid values are {{true, t, yes, y, 1, false, f, no, n, 0}}",
            s
        ),
    }
}

fn split_pair(s: &str) -> Result<(&str, &str)> {
    let (min, max) = s
        .split_once(',')
        .with_context(|| format!("Expected \"m,n\", got '{}'", s))?;
    Ok((min.trim(), max.trim()))
}

/// Parse a file-count bound "m,n"
///
/// Integers give an absolute count; a `.` in either value makes both ratios.
pub fn parse_file_count_bound(s: &str) -> Result<Bound> {
    let (min, max) = split_pair(s)?;
    if min.contains('.') || max.contains('.') {
        let lo: f64 = min.parse().with_context(|| format!("Invalid ratio: {}", min))?;
        let hi: f64 = max.parse().with_context(|| format!("Invalid ratio: {}", max))?;
        Ok(Bound::ratio(lo, hi))
    } else {
        let lo: u64 = min.parse().with_context(|| format!("Invalid file count: {}", min))?;
        let hi: u64 = max.parse().with_context(|| format!("Invalid file count: {}", max))?;
        Ok(Bound::absolute(lo, hi))
    }
}

/// Parse an extent bound "m,n"
///
/// Values with a size unit (`4k,64k`) give absolute byte sizes; plain
/// numbers are ratios of the file size.
pub fn parse_extent_bound(s: &str) -> Result<Bound> {
    let (min, max) = split_pair(s)?;
    if has_size_unit(min) || has_size_unit(max) {
        Ok(Bound::absolute(parse_size(min)?, parse_size(max)?))
    } else {
        let lo: f64 = min.parse().with_context(|| format!("Invalid ratio: {}", min))?;
        let hi: f64 = max.parse().with_context(|| format!("Invalid ratio: {}", max))?;
        Ok(Bound::ratio(lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("12").unwrap(), 12);
        assert_eq!(parse_size("34b").unwrap(), 34);
        assert_eq!(parse_size("2kB").unwrap(), 2048);
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("3MB").unwrap(), 3 * 1024 * 1024);
        assert_eq!(parse_size("4G").unwrap(), 4 * 1024 * 1024 * 1024);
        assert!(parse_size("abc").is_err());
        assert!(parse_size("").is_err());
    }

    #[test]
    fn test_parse_time_ns() {
        assert_eq!(parse_time_ns("300").unwrap(), 300);
        assert_eq!(parse_time_ns("500ns").unwrap(), 500);
        assert_eq!(parse_time_ns("10us").unwrap(), 10_000);
        assert_eq!(parse_time_ns("250ms").unwrap(), 250_000_000);
        assert_eq!(parse_time_ns("10s").unwrap(), 10_000_000_000);
        assert_eq!(parse_time_ns("5min").unwrap(), 300_000_000_000);
        assert_eq!(parse_time_ns("2h").unwrap(), 7_200_000_000_000);
        assert_eq!(parse_time_ns("-5s").unwrap(), 0);
        assert!(parse_time_ns("ten").is_err());
    }

    #[test]
    fn test_parse_bool() {
        for s in ["true", "T", "yes", "Y", "1"] {
            assert!(parse_bool(s).unwrap());
        }
        for s in ["false", "F", "no", "N", "0"] {
            assert!(!parse_bool(s).unwrap());
        }
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_parse_file_count_bound() {
        assert_eq!(parse_file_count_bound("2,5").unwrap(), Bound::absolute(2, 5));
        assert_eq!(parse_file_count_bound("0.2,0.5").unwrap(), Bound::ratio(0.2, 0.5));
        assert_eq!(parse_file_count_bound("1,0.5").unwrap(), Bound::ratio(0.5, 1.0));
        assert_eq!(parse_file_count_bound("9,3").unwrap(), Bound::absolute(3, 9));
        assert!(parse_file_count_bound("5").is_err());
    }

    #[test]
    fn test_parse_extent_bound() {
        assert_eq!(parse_extent_bound("0.1,0.3").unwrap(), Bound::ratio(0.1, 0.3));
        assert_eq!(parse_extent_bound("1,1").unwrap(), Bound::ratio(1.0, 1.0));
        assert_eq!(
            parse_extent_bound("4k,64k").unwrap(),
            Bound::absolute(4096, 65_536)
        );
        assert_eq!(
            parse_extent_bound("4096b, 8k").unwrap(),
            Bound::absolute(4096, 8192)
        );
    }
}
