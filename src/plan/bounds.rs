//! Bound resolution
//!
//! Users describe how many files a scan touches and how much of each file it
//! reads as ranges, either absolute (file counts, byte sizes) or ratios of
//! the domain. `BoundsResolver` turns those raw ranges into the concrete
//! sampling domains the planner draws from. Resolution happens once per
//! session, before any I/O, and its output is shared read-only by every
//! worker.

use crate::error::BenchError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed numeric range, absolute or relative to a domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bound {
    /// Fractions of the domain, nominally in `[0, 1]`
    Ratio { min: f64, max: f64 },
    /// File counts or byte sizes
    Absolute { min: u64, max: u64 },
}

impl Bound {
    /// Ratio range; inverted endpoints are swapped
    pub fn ratio(a: f64, b: f64) -> Self {
        if b < a {
            Bound::Ratio { min: b, max: a }
        } else {
            Bound::Ratio { min: a, max: b }
        }
    }

    /// Absolute range; inverted endpoints are swapped
    pub fn absolute(a: u64, b: u64) -> Self {
        Bound::Absolute {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// `{0, 0}`: every file, or a full scan of each file
    pub fn all() -> Self {
        Bound::Absolute { min: 0, max: 0 }
    }

    pub fn is_ratio(&self) -> bool {
        matches!(self, Bound::Ratio { .. })
    }

    fn normalized(self) -> Self {
        match self {
            Bound::Ratio { min, max } => Bound::ratio(min, max),
            Bound::Absolute { min, max } => Bound::absolute(min, max),
        }
    }
}

impl Default for Bound {
    fn default() -> Self {
        Bound::all()
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Ratio { min, max } => write!(f, "{},{}", min, max),
            Bound::Absolute { min, max } => write!(f, "{},{}", min, max),
        }
    }
}

/// How the files of one scan iteration are ordered and shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanShape {
    /// Visit the chosen files in name order instead of draw order
    pub sequential_file_order: bool,
    /// Read one file to completion before opening the next
    pub sequential_scan_order: bool,
    /// Tail of the first file, all of the interior files, head of the last
    pub full_middle: bool,
}

impl Default for ScanShape {
    fn default() -> Self {
        Self {
            sequential_file_order: true,
            sequential_scan_order: true,
            full_middle: false,
        }
    }
}

/// Number of files one scan iteration touches, within `[1, catalog_len]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedFileCountBound {
    pub min_files: usize,
    pub max_files: usize,
}

/// Size of the extent read from each file
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtentRange {
    /// Fraction of the file size, within `[0, 1]`
    Ratio { min: f64, max: f64 },
    /// Bytes
    Size { min: u64, max: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedExtentBound {
    pub range: ExtentRange,
    /// Every file is read from start to end
    pub full_scan: bool,
}

/// Everything the planner needs, fixed for the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedBounds {
    pub files: ResolvedFileCountBound,
    pub extent: ResolvedExtentBound,
    pub shape: ScanShape,
}

/// Products this close to an integer are treated as that integer before
/// rounding up, so `0.3 * 10` resolves to 3 files rather than 4.
const RATIO_SNAP_EPSILON: f64 = 1e-9;

fn check_ratio(value: f64, what: &str) -> Result<f64> {
    if value.is_nan() {
        return Err(BenchError::invalid_bound(format!("{} ratio is not a number", what)));
    }
    if value < 0.0 {
        return Err(BenchError::invalid_bound(format!(
            "{} ratio {} is negative",
            what, value
        )));
    }
    Ok(value.min(1.0))
}

fn ceil_snapped(x: f64) -> u64 {
    let nearest = x.round();
    if (x - nearest).abs() < RATIO_SNAP_EPSILON {
        nearest as u64
    } else {
        x.ceil() as u64
    }
}

/// Resolves raw bounds against a catalog of `catalog_len` files
#[derive(Debug, Clone, Copy)]
pub struct BoundsResolver {
    catalog_len: usize,
}

impl BoundsResolver {
    pub fn new(catalog_len: usize) -> Self {
        Self { catalog_len }
    }

    /// Resolve both bounds and apply the single-file overrides
    pub fn resolve(&self, file_count: &Bound, extent: &Bound, shape: ScanShape) -> Result<ResolvedBounds> {
        if self.catalog_len == 0 {
            return Err(BenchError::invalid_bound("catalog holds no files"));
        }

        let files = self.file_count(file_count)?;
        let extent = self.extent(extent)?;

        let shape = if self.catalog_len == 1 {
            ScanShape {
                sequential_file_order: true,
                sequential_scan_order: true,
                full_middle: shape.full_middle,
            }
        } else {
            shape
        };

        let resolved = ResolvedBounds { files, extent, shape };
        tracing::debug!(?resolved, catalog_len = self.catalog_len, "resolved bounds");
        Ok(resolved)
    }

    /// Resolve the number of files per scan iteration
    pub fn file_count(&self, bound: &Bound) -> Result<ResolvedFileCountBound> {
        let n = self.catalog_len as u64;
        if n == 1 {
            // Validate anyway so bad input is reported the same way
            if let Bound::Ratio { min, max } = bound {
                check_ratio(*min, "file count")?;
                check_ratio(*max, "file count")?;
            }
            return Ok(ResolvedFileCountBound {
                min_files: 1,
                max_files: 1,
            });
        }

        let (lo, hi) = match bound.normalized() {
            Bound::Ratio { min, max } => {
                let min = check_ratio(min, "file count")?;
                let max = check_ratio(max, "file count")?;
                (
                    ceil_snapped(min * n as f64).min(n),
                    ceil_snapped(max * n as f64).min(n),
                )
            }
            Bound::Absolute { min, max } => (min, max),
        };

        let (lo, hi) = if lo == 0 && hi == 0 {
            (n, n)
        } else if lo >= n {
            (n, n)
        } else {
            (lo.max(1), hi.min(n))
        };

        Ok(ResolvedFileCountBound {
            min_files: lo as usize,
            max_files: hi as usize,
        })
    }

    /// Resolve the per-file extent range
    pub fn extent(&self, bound: &Bound) -> Result<ResolvedExtentBound> {
        match bound.normalized() {
            Bound::Ratio { min, max } => {
                let min = check_ratio(min, "extent")?;
                let max = check_ratio(max, "extent")?;
                let full = (min == 0.0 && max == 0.0) || (min == 1.0 && max == 1.0);
                let range = if full {
                    ExtentRange::Ratio { min: 1.0, max: 1.0 }
                } else {
                    ExtentRange::Ratio { min, max }
                };
                Ok(ResolvedExtentBound { range, full_scan: full })
            }
            Bound::Absolute { min, max } => Ok(ResolvedExtentBound {
                range: ExtentRange::Size { min, max },
                full_scan: min == 0 && max == 0,
            }),
        }
    }
}

impl ResolvedFileCountBound {
    /// Express the resolved range as an absolute bound
    pub fn as_bound(&self) -> Bound {
        Bound::absolute(self.min_files as u64, self.max_files as u64)
    }
}

impl ResolvedExtentBound {
    /// Express the resolved range as a raw bound
    pub fn as_bound(&self) -> Bound {
        match self.range {
            ExtentRange::Ratio { min, max } => Bound::ratio(min, max),
            ExtentRange::Size { min, max } => Bound::absolute(min, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize, bound: Bound) -> (usize, usize) {
        let r = BoundsResolver::new(n).file_count(&bound).unwrap();
        (r.min_files, r.max_files)
    }

    #[test]
    fn test_ratio_file_count() {
        assert_eq!(files(10, Bound::ratio(0.2, 0.5)), (2, 5));
        assert_eq!(files(10, Bound::ratio(0.3, 0.7)), (3, 7));
        assert_eq!(files(10, Bound::ratio(0.21, 0.49)), (3, 5));
    }

    #[test]
    fn test_ratio_above_one_clamps() {
        assert_eq!(files(10, Bound::ratio(0.5, 3.0)), (5, 10));
    }

    #[test]
    fn test_zero_bound_means_all_files() {
        assert_eq!(files(5, Bound::absolute(0, 0)), (5, 5));
        assert_eq!(files(5, Bound::ratio(0.0, 0.0)), (5, 5));
    }

    #[test]
    fn test_zero_min_becomes_one() {
        assert_eq!(files(10, Bound::absolute(0, 4)), (1, 4));
        assert_eq!(files(10, Bound::ratio(0.0, 0.05)), (1, 1));
    }

    #[test]
    fn test_min_at_or_above_catalog_size() {
        assert_eq!(files(4, Bound::absolute(4, 9)), (4, 4));
        assert_eq!(files(4, Bound::absolute(7, 9)), (4, 4));
    }

    #[test]
    fn test_max_clamped_to_catalog_size() {
        assert_eq!(files(4, Bound::absolute(2, 9)), (2, 4));
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        assert_eq!(files(10, Bound::absolute(6, 2)), (2, 6));
        assert_eq!(files(10, Bound::Absolute { min: 6, max: 2 }), (2, 6));
        assert_eq!(files(10, Bound::Ratio { min: 0.5, max: 0.2 }), (2, 5));
    }

    #[test]
    fn test_single_file_catalog_forces_sequential() {
        let shape = ScanShape {
            sequential_file_order: false,
            sequential_scan_order: false,
            full_middle: true,
        };
        let r = BoundsResolver::new(1)
            .resolve(&Bound::absolute(3, 8), &Bound::ratio(0.1, 0.2), shape)
            .unwrap();
        assert_eq!(r.files, ResolvedFileCountBound { min_files: 1, max_files: 1 });
        assert!(r.shape.sequential_file_order);
        assert!(r.shape.sequential_scan_order);
    }

    #[test]
    fn test_negative_ratio_rejected() {
        let resolver = BoundsResolver::new(10);
        assert!(matches!(
            resolver.file_count(&Bound::ratio(-0.1, 0.5)),
            Err(BenchError::InvalidBound { .. })
        ));
        assert!(matches!(
            resolver.extent(&Bound::ratio(-0.5, 0.5)),
            Err(BenchError::InvalidBound { .. })
        ));
        assert!(resolver.extent(&Bound::ratio(f64::NAN, 0.5)).is_err());
    }

    #[test]
    fn test_extent_full_scan_cases() {
        let resolver = BoundsResolver::new(3);
        assert!(resolver.extent(&Bound::absolute(0, 0)).unwrap().full_scan);
        assert!(resolver.extent(&Bound::ratio(0.0, 0.0)).unwrap().full_scan);
        assert!(resolver.extent(&Bound::ratio(1.0, 1.0)).unwrap().full_scan);
        assert!(resolver.extent(&Bound::ratio(1.0, 4.0)).unwrap().full_scan);
        assert!(!resolver.extent(&Bound::ratio(0.5, 1.0)).unwrap().full_scan);
        assert!(!resolver.extent(&Bound::absolute(0, 4096)).unwrap().full_scan);
    }

    #[test]
    fn test_extent_ratio_clamped() {
        let r = BoundsResolver::new(3).extent(&Bound::ratio(0.25, 2.0)).unwrap();
        assert_eq!(r.range, ExtentRange::Ratio { min: 0.25, max: 1.0 });
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = BoundsResolver::new(10);
        for bound in [
            Bound::ratio(0.2, 0.5),
            Bound::absolute(0, 0),
            Bound::absolute(0, 3),
            Bound::absolute(12, 40),
        ] {
            let once = resolver.file_count(&bound).unwrap();
            let twice = resolver.file_count(&once.as_bound()).unwrap();
            assert_eq!(once, twice);
            assert!(1 <= once.min_files && once.min_files <= once.max_files && once.max_files <= 10);
        }

        let once = resolver.extent(&Bound::ratio(0.1, 0.4)).unwrap();
        let twice = resolver.extent(&once.as_bound()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bound_serde_round_trip_shape() {
        let bound: Bound = serde_json::from_str(r#"{"kind":"ratio","min":0.1,"max":0.3}"#).unwrap();
        assert_eq!(bound, Bound::Ratio { min: 0.1, max: 0.3 });
        assert!(bound.is_ratio());
    }
}
